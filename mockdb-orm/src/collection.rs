//! Ordered sequences of models of one kind.

use std::ops::Index;

use mockdb_core::{
    error::{DbError, DbResult},
    record::Record,
};

use crate::model::Model;

/// An ordered sequence of models that share one kind.
///
/// A collection reflects the store at the time of the query that produced it; it is not
/// a live view. An empty collection still knows which kind it holds.
#[derive(Debug, Clone)]
pub struct Collection {
    model_name: String,
    models: Vec<Model>,
}

impl Collection {
    /// Creates a collection of `model_name` models.
    pub fn new(model_name: impl Into<String>, models: Vec<Model>) -> Self {
        Self { model_name: model_name.into(), models }
    }

    /// Returns the kind name of the models held.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    pub fn first(&self) -> Option<&Model> {
        self.models.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Model> {
        self.models.iter()
    }

    /// Iterates over the models' own copies; changes reach the store only when saved.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Model> {
        self.models.iter_mut()
    }

    /// Returns the ids of the saved models, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.models.iter().filter_map(Model::id).collect()
    }

    /// Returns a new collection with the models for which `predicate` holds.
    pub fn filter<F>(&self, predicate: F) -> Collection
    where
        F: Fn(&Model) -> bool,
    {
        Collection::new(
            self.model_name.clone(),
            self.models
                .iter()
                .filter(|model| predicate(model))
                .cloned()
                .collect(),
        )
    }

    /// Returns a new collection with the models in `start..end`, clamped to the length.
    pub fn slice(&self, start: usize, end: usize) -> Collection {
        let end = end.min(self.models.len());
        let start = start.min(end);

        Collection::new(self.model_name.clone(), self.models[start..end].to_vec())
    }

    /// Sets the attributes on every model and saves each one.
    pub fn update_all<R>(&mut self, attrs: R) -> DbResult<()>
    where
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        let attrs = attrs.try_into().map_err(Into::into)?;

        for model in &mut self.models {
            model.update(attrs.clone())?;
        }

        Ok(())
    }

    /// Saves every model.
    pub fn save_all(&mut self) -> DbResult<()> {
        self.models.iter_mut().try_for_each(Model::save)
    }

    /// Reloads every model from the store.
    pub fn reload_all(&mut self) -> DbResult<()> {
        self.models.iter_mut().try_for_each(Model::reload)
    }

    /// Destroys every model and returns how many stored records were removed.
    pub fn destroy_all(self) -> DbResult<usize> {
        let mut removed = 0;

        for model in self.models {
            if model.destroy()? {
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Consumes the collection and returns its models.
    pub fn into_vec(self) -> Vec<Model> {
        self.models
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.model_name == other.model_name && self.models == other.models
    }
}

impl Index<usize> for Collection {
    type Output = Model;

    fn index(&self, index: usize) -> &Model {
        &self.models[index]
    }
}

impl IntoIterator for Collection {
    type Item = Model;
    type IntoIter = std::vec::IntoIter<Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Model;
    type IntoIter = std::slice::Iter<'a, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}
