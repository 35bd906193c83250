//! Model definitions and model instances.
//!
//! A [`ModelDef`] describes one model kind: the associations it declares and any computed
//! accessors. [`ModelDef::new()`] is the base definition, which makes the model a plain
//! attribute wrapper. A [`Model`] is one record read through a [`Schema`], tagged with
//! its kind and carrying that kind's definition.
//!
//! # Example
//!
//! ```ignore
//! use mockdb_orm::model::ModelDef;
//! use serde_json::json;
//!
//! let post = ModelDef::new()
//!     .belongs_to("author", "user")
//!     .computed("slug", |post| json!(post["title"].as_str().unwrap_or("").to_lowercase()));
//!
//! let user = ModelDef::new().has_many("posts", "post");
//! ```

use std::{fmt, ops::Index, rc::Rc};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{trace, warn};

use mockdb_core::{
    error::{DbError, DbResult},
    query::Where,
    record::{Attrs, ID_FIELD, Record, RecordId},
};

use crate::{collection::Collection, schema::Schema};

/// A computed accessor declared on a model kind.
pub type Computed = Rc<dyn Fn(&Model) -> Value>;

/// The shape of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    /// The owner holds the foreign key of a single target.
    BelongsTo,
    /// Every target holds the owner's id as a foreign key.
    HasMany,
}

/// An association declared on a model kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    name: String,
    kind: AssociationKind,
    target: String,
    foreign_key: Option<String>,
}

impl Association {
    /// Declares that the owner points at one `target` through `<name>_id`.
    pub fn belongs_to(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::BelongsTo,
            target: target.into(),
            foreign_key: None,
        }
    }

    /// Declares that many `target` records point at the owner through `<owner kind>_id`.
    pub fn has_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::HasMany,
            target: target.into(),
            foreign_key: None,
        }
    }

    /// Overrides the foreign key attribute.
    pub fn foreign_key(mut self, key: impl Into<String>) -> Self {
        self.foreign_key = Some(key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AssociationKind {
        self.kind
    }

    /// The model kind this association points at.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the foreign key attribute for an owner of kind `owner`.
    pub fn key_for(&self, owner: &str) -> String {
        match (&self.foreign_key, self.kind) {
            (Some(key), _) => key.clone(),
            (None, AssociationKind::BelongsTo) => format!("{}_id", self.name),
            (None, AssociationKind::HasMany) => format!("{owner}_id"),
        }
    }
}

/// Per-kind model configuration.
#[derive(Clone, Default)]
pub struct ModelDef {
    associations: Vec<Association>,
    computed: Vec<(String, Computed)>,
}

impl ModelDef {
    /// The base definition: no associations, no computed accessors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an association.
    pub fn association(mut self, association: Association) -> Self {
        self.associations.push(association);
        self
    }

    /// Shorthand for [`Association::belongs_to`].
    pub fn belongs_to(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.association(Association::belongs_to(name, target))
    }

    /// Shorthand for [`Association::has_many`].
    pub fn has_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.association(Association::has_many(name, target))
    }

    /// Adds a computed accessor.
    pub fn computed<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Model) -> Value + 'static,
    {
        self.computed.push((name.into(), Rc::new(accessor)));
        self
    }

    /// Looks up an association by name.
    pub fn find_association(&self, name: &str) -> Option<&Association> {
        self.associations.iter().find(|association| association.name == name)
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    fn find_computed(&self, name: &str) -> Option<&Computed> {
        self.computed
            .iter()
            .find(|(computed, _)| computed == name)
            .map(|(_, accessor)| accessor)
    }
}

impl fmt::Debug for ModelDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDef")
            .field("associations", &self.associations)
            .field(
                "computed",
                &self.computed.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The result of traversing an association.
#[derive(Debug, Clone)]
pub enum Related {
    /// A `belongs_to` target, `None` when the foreign key is unset or dangling.
    One(Option<Model>),
    /// The `has_many` targets.
    Many(Collection),
}

impl Related {
    /// Returns the single target of a `belongs_to` association.
    pub fn into_model(self) -> Option<Model> {
        match self {
            Related::One(model) => model,
            Related::Many(_) => None,
        }
    }

    /// Returns the targets of a `has_many` association.
    pub fn into_collection(self) -> Option<Collection> {
        match self {
            Related::One(_) => None,
            Related::Many(collection) => Some(collection),
        }
    }
}

/// One record read through a schema.
///
/// A model holds its own copy of the record's attributes. Changing it with
/// [`set`](Model::set) never touches the store until [`save`](Model::save) is called.
///
/// Attributes can be read as a map with [`attrs`](Model::attrs) or directly:
///
/// ```ignore
/// let link = schema.kind("user")?.find(1)?.unwrap();
/// assert_eq!(link.attrs()["name"], link["name"]);
/// ```
///
/// Two saved models are equal when they have the same kind and the same id.
#[derive(Clone)]
pub struct Model {
    kind: String,
    record: Record,
    def: Rc<ModelDef>,
    schema: Schema,
    /// Whether the record has been read from or written to the store.
    persisted: bool,
}

impl Model {
    pub(crate) fn new(
        kind: String,
        record: Record,
        def: Rc<ModelDef>,
        schema: Schema,
        persisted: bool,
    ) -> Self {
        Self { kind, record, def, schema, persisted }
    }

    /// Returns the kind name this model was registered under.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the id, or `None` for a new model without an explicit id.
    pub fn id(&self) -> Option<&str> {
        self.record.id()
    }

    /// Returns whether this model has not been saved yet, whether or not it carries an
    /// explicit id.
    pub fn is_new(&self) -> bool {
        !self.persisted
    }

    /// Returns a read-only snapshot of the attributes.
    pub fn attrs(&self) -> &Attrs {
        self.record.attrs()
    }

    /// Returns a stored attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.record.get(name)
    }

    /// Evaluates a computed accessor declared on this model's kind.
    pub fn computed(&self, name: &str) -> Option<Value> {
        self.def.find_computed(name).map(|accessor| accessor(self))
    }

    /// Returns this kind's definition.
    pub fn def(&self) -> &ModelDef {
        &self.def
    }

    /// Returns the schema this model was read through.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Sets an attribute on this model's copy.
    ///
    /// The id of a saved model cannot be changed; attempts are ignored.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();

        if name == ID_FIELD && self.persisted {
            warn!(kind = %self.kind, "ignoring id change on a saved model");
            return self;
        }

        self.record.insert(name, value);
        self
    }

    /// Sets several attributes and saves.
    pub fn update<R>(&mut self, attrs: R) -> DbResult<()>
    where
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        let attrs = attrs.try_into().map_err(Into::into)?;

        for (name, value) in attrs.into_attrs() {
            self.set(name, value);
        }

        self.save()
    }

    /// Persists this model's copy.
    ///
    /// A new model is inserted, keeping an explicit id or receiving the next one; a
    /// saved model's attributes are merged into the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateId`] if a new model's explicit id is taken, and
    /// [`DbError::RecordNotFound`] if a saved model's record was removed in the meantime.
    pub fn save(&mut self) -> DbResult<()> {
        let collection = self.schema.collection_for(&self.kind)?;
        let store = self.schema.store();

        if !self.persisted {
            let mut stored = store.insert_records(&collection, vec![self.record.clone()])?;
            if let Some(record) = stored.pop() {
                self.record = record;
            }
            self.persisted = true;

            trace!(kind = %self.kind, id = self.id(), "inserted model");

            return Ok(());
        }

        let id = self.stored_id()?;

        if store.get_record(&collection, &id)?.is_none() {
            return Err(DbError::RecordNotFound {
                id: id.to_string(),
                collection,
            });
        }

        if let Some(record) = store.update_record(&collection, &id, self.record.attrs())? {
            self.record = record;
        }

        trace!(kind = %self.kind, %id, "saved model");

        Ok(())
    }

    /// Replaces this model's copy with the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UnsavedModel`] if the model was never saved, and
    /// [`DbError::RecordNotFound`] if its record has been removed.
    pub fn reload(&mut self) -> DbResult<()> {
        let id = self.stored_id()?;
        let collection = self.schema.collection_for(&self.kind)?;

        match self.schema.store().get_record(&collection, &id)? {
            Some(record) => {
                self.record = record;
                Ok(())
            }
            None => Err(DbError::RecordNotFound {
                id: id.to_string(),
                collection,
            }),
        }
    }

    fn stored_id(&self) -> DbResult<RecordId> {
        match self.record.record_id()? {
            Some(id) if self.persisted => Ok(id),
            _ => Err(DbError::UnsavedModel(self.kind.clone())),
        }
    }

    /// Removes the stored record.
    ///
    /// # Returns
    ///
    /// Whether a stored record was removed. Destroying a new model is a no-op.
    pub fn destroy(self) -> DbResult<bool> {
        if !self.persisted {
            return Ok(false);
        }

        let id = self.stored_id()?;

        let collection = self.schema.collection_for(&self.kind)?;
        let removed = self.schema.store().remove_record(&collection, &id)?.is_some();

        trace!(kind = %self.kind, %id, removed, "destroyed model");

        Ok(removed)
    }

    /// Traverses an association declared on this model's kind.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UnknownAssociation`] if no association has this name, and
    /// [`DbError::UnknownModel`] if its target kind is not registered.
    pub fn related(&self, name: &str) -> DbResult<Related> {
        let association = self
            .def
            .find_association(name)
            .ok_or_else(|| DbError::UnknownAssociation {
                kind: self.kind.clone(),
                name: name.to_string(),
            })?;
        let target = self.schema.kind(association.target())?;
        let key = association.key_for(&self.kind);

        match association.kind() {
            AssociationKind::BelongsTo => match self.record.get(&key) {
                None | Some(Value::Null) => Ok(Related::One(None)),
                Some(value) => Ok(Related::One(target.find(RecordId::from_value(value)?)?)),
            },
            AssociationKind::HasMany => match self.id() {
                Some(id) if self.persisted => Ok(Related::Many(target.filter(Where::eq(key, id))?)),
                _ => Ok(Related::Many(Collection::new(association.target().to_string(), vec![]))),
            },
        }
    }

    /// Deserializes this model's attributes into a concrete type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> DbResult<T> {
        self.record.deserialize()
    }

    /// Returns the attributes as a JSON object.
    pub fn to_json(&self) -> Value {
        self.record.clone().into_value()
    }

    /// Consumes the model and returns its record.
    pub fn into_record(self) -> Record {
        self.record
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.persisted
            && other.persisted
            && match (self.id(), other.id()) {
                (Some(left), Some(right)) => left == right,
                _ => false,
            }
    }
}

impl Index<&str> for Model {
    type Output = Value;

    /// Returns the attribute value, or `Value::Null` if it is absent.
    fn index(&self, name: &str) -> &Value {
        &self.record[name]
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("kind", &self.kind)
            .field("attrs", self.record.attrs())
            .field("persisted", &self.persisted)
            .finish()
    }
}
