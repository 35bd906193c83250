//! The schema: model kind registration and the query surface.
//!
//! A [`Schema`] is bound to one record store. Each registered kind maps to one store
//! collection (through the schema's [`Inflector`]) and is queried through
//! [`Schema::kind`]:
//!
//! ```ignore
//! use mockdb_orm::{Schema, ModelDef};
//! use mockdb_memory::Db;
//! use serde_json::json;
//!
//! let db = Db::from_seed(json!({ "users": [{ "id": 1, "name": "Link" }] }))?;
//! let schema = Schema::builder(db)
//!     .register("user", ModelDef::new())
//!     .build()?;
//!
//! let link = schema.kind("user")?.find(1)?.unwrap();
//! assert_eq!(link["name"], json!("Link"));
//! # Ok::<(), mockdb_core::error::DbError>(())
//! ```

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use tracing::debug;

use mockdb_core::{
    backend::RecordStore,
    error::{DbError, DbResult},
    query::Where,
    record::{Record, RecordId},
};

use crate::{
    collection::Collection,
    inflector::{DefaultInflector, Inflector},
    model::{Model, ModelDef},
};

struct Registration {
    collection: String,
    def: Rc<ModelDef>,
}

#[derive(Default)]
struct Registry {
    models: BTreeMap<String, Registration>,
    kinds_by_collection: BTreeMap<String, String>,
}

struct SchemaInner {
    store: Rc<dyn RecordStore>,
    inflector: Box<dyn Inflector>,
    registry: RefCell<Registry>,
}

/// Model registrations bound to a record store.
///
/// `Schema` is a cheap, cloneable handle; clones share the same registrations. Every
/// model read through a schema keeps a handle to it for association traversal and
/// persistence. Registrations belong to the schema instance, so separate schemas never
/// see each other's kinds.
#[derive(Clone)]
pub struct Schema {
    inner: Rc<SchemaInner>,
}

impl Schema {
    /// Creates a schema with no registered kinds and the [`DefaultInflector`].
    pub fn new(store: impl RecordStore + 'static) -> Self {
        Self::from_parts(Rc::new(store), Box::new(DefaultInflector))
    }

    /// Creates a builder for a schema over the given store.
    pub fn builder(store: impl RecordStore + 'static) -> SchemaBuilder {
        SchemaBuilder {
            store: Rc::new(store),
            inflector: Box::new(DefaultInflector),
            models: Vec::new(),
        }
    }

    fn from_parts(store: Rc<dyn RecordStore>, inflector: Box<dyn Inflector>) -> Self {
        Self {
            inner: Rc::new(SchemaInner {
                store,
                inflector,
                registry: RefCell::new(Registry::default()),
            }),
        }
    }

    /// Returns the underlying record store.
    pub fn store(&self) -> &dyn RecordStore {
        self.inner.store.as_ref()
    }

    /// Registers a model kind.
    ///
    /// The kind's store collection is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateModel`] if the kind is already registered, or if
    /// another kind already maps to the same collection.
    pub fn register_model(&self, kind: &str, def: ModelDef) -> DbResult<()> {
        let mut registry = self
            .inner
            .registry
            .try_borrow_mut()
            .map_err(|_| DbError::Reentrant("register_model"))?;

        if registry.models.contains_key(kind) {
            return Err(DbError::DuplicateModel(kind.to_string()));
        }

        let collection = self.inner.inflector.pluralize(kind);

        if let Some(other) = registry.kinds_by_collection.get(&collection) {
            return Err(DbError::DuplicateModel(format!(
                "{kind} (collection {collection} already belongs to {other})"
            )));
        }

        if !self.inner.store.has_collection(&collection) {
            self.inner.store.create_collection(&collection)?;
        }

        debug!(kind, collection = %collection, "registered model");

        registry
            .kinds_by_collection
            .insert(collection.clone(), kind.to_string());
        registry.models.insert(
            kind.to_string(),
            Registration { collection, def: Rc::new(def) },
        );

        Ok(())
    }

    /// Returns whether a kind is registered.
    pub fn has_model(&self, kind: &str) -> bool {
        self.inner
            .registry
            .try_borrow()
            .map(|registry| registry.models.contains_key(kind))
            .unwrap_or(false)
    }

    /// Returns the registered kind names, sorted.
    pub fn model_names(&self) -> Vec<String> {
        self.inner
            .registry
            .try_borrow()
            .map(|registry| registry.models.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the store collection backing a kind.
    pub fn collection_for(&self, kind: &str) -> DbResult<String> {
        self.registration(kind).map(|(collection, _)| collection)
    }

    /// Returns the kind backed by a store collection.
    pub fn kind_for_collection(&self, collection: &str) -> Option<String> {
        self.inner
            .registry
            .try_borrow()
            .ok()
            .and_then(|registry| registry.kinds_by_collection.get(collection).cloned())
    }

    /// Returns the query surface for a registered kind.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UnknownModel`] if the kind is not registered.
    pub fn kind(&self, kind: &str) -> DbResult<ModelQuery<'_>> {
        let (collection, def) = self.registration(kind)?;

        Ok(ModelQuery {
            schema: self,
            kind: kind.to_string(),
            collection,
            def,
        })
    }

    fn registration(&self, kind: &str) -> DbResult<(String, Rc<ModelDef>)> {
        let registry = self
            .inner
            .registry
            .try_borrow()
            .map_err(|_| DbError::Reentrant("registration"))?;

        registry
            .models
            .get(kind)
            .map(|registration| (registration.collection.clone(), Rc::clone(&registration.def)))
            .ok_or_else(|| DbError::UnknownModel(kind.to_string()))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("store", &self.inner.store)
            .field("models", &self.model_names())
            .finish()
    }
}

/// Builder for a [`Schema`] with a custom inflector and initial registrations.
pub struct SchemaBuilder {
    store: Rc<dyn RecordStore>,
    inflector: Box<dyn Inflector>,
    models: Vec<(String, ModelDef)>,
}

impl SchemaBuilder {
    /// Sets the kind-to-collection naming rule.
    pub fn inflector(mut self, inflector: impl Inflector + 'static) -> Self {
        self.inflector = Box::new(inflector);
        self
    }

    /// Registers a kind when the schema is built.
    pub fn register(mut self, kind: impl Into<String>, def: ModelDef) -> Self {
        self.models.push((kind.into(), def));
        self
    }

    /// Builds the schema, registering every kind in order.
    ///
    /// # Errors
    ///
    /// Fails with the first registration error.
    pub fn build(self) -> DbResult<Schema> {
        let schema = Schema::from_parts(self.store, self.inflector);

        for (kind, def) in self.models {
            schema.register_model(&kind, def)?;
        }

        Ok(schema)
    }
}

/// The query surface of one registered kind.
#[derive(Debug)]
pub struct ModelQuery<'a> {
    schema: &'a Schema,
    kind: String,
    collection: String,
    def: Rc<ModelDef>,
}

impl<'a> ModelQuery<'a> {
    /// Returns the kind name.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the store collection backing this kind.
    pub fn collection_name(&self) -> &str {
        &self.collection
    }

    fn wrap(&self, record: Record) -> Model {
        Model::new(self.kind.clone(), record, Rc::clone(&self.def), self.schema.clone(), true)
    }

    fn wrap_all(&self, records: Vec<Record>) -> Collection {
        Collection::new(
            self.kind.clone(),
            records.into_iter().map(|record| self.wrap(record)).collect(),
        )
    }

    /// Returns every model, in insertion order.
    pub fn all(&self) -> DbResult<Collection> {
        Ok(self.wrap_all(self.schema.store().all_records(&self.collection)?))
    }

    /// Finds a model by id, or `None` if there is no such record.
    pub fn find(&self, id: impl Into<RecordId>) -> DbResult<Option<Model>> {
        Ok(self
            .schema
            .store()
            .get_record(&self.collection, &id.into())?
            .map(|record| self.wrap(record)))
    }

    /// Finds models by id, in request order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::PartialResult`] unless every id was found.
    pub fn find_many<U>(&self, ids: impl IntoIterator<Item = U>) -> DbResult<Collection>
    where
        U: Into<RecordId>,
    {
        let ids = ids.into_iter().map(Into::into).collect::<Vec<_>>();

        Ok(self.wrap_all(self.schema.store().get_records(&self.collection, &ids)?))
    }

    /// Returns the first model in insertion order.
    pub fn first(&self) -> DbResult<Option<Model>> {
        Ok(self
            .schema
            .store()
            .first_record(&self.collection)?
            .map(|record| self.wrap(record)))
    }

    /// Returns the models matching the query, possibly none.
    pub fn filter(&self, query: impl Into<Where>) -> DbResult<Collection> {
        Ok(self.wrap_all(self.schema.store().query_records(&self.collection, &query.into())?))
    }

    /// Returns the first model matching the query.
    pub fn find_by(&self, query: impl Into<Where>) -> DbResult<Option<Model>> {
        Ok(self.filter(query)?.into_iter().next())
    }

    /// Builds an unsaved model.
    pub fn new_model<R>(&self, attrs: R) -> DbResult<Model>
    where
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        Ok(Model::new(
            self.kind.clone(),
            attrs.try_into().map_err(Into::into)?,
            Rc::clone(&self.def),
            self.schema.clone(),
            false,
        ))
    }

    /// Builds and saves a model.
    pub fn create<R>(&self, attrs: R) -> DbResult<Model>
    where
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        let mut model = self.new_model(attrs)?;
        model.save()?;

        Ok(model)
    }

    /// Returns the first model whose attributes equal `attrs`, creating it if none does.
    pub fn first_or_create<R>(&self, attrs: R) -> DbResult<Model>
    where
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        let attrs = attrs.try_into().map_err(Into::into)?;

        match self.find_by(Where::Attrs(attrs.attrs().clone()))? {
            Some(model) => Ok(model),
            None => self.create(attrs),
        }
    }
}
