//! Core types for raw records and their identifiers.
//!
//! A [`Record`] is a flat JSON object: a mapping from attribute name to attribute value.
//! Once a record has been stored it always carries an `id` attribute, and that attribute
//! is always a JSON string, whatever type was used when the record was inserted. The
//! [`RecordId`] type performs that normalization.

use std::{fmt, ops::Index};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, from_value, to_value};

use crate::error::{DbError, DbResult};

/// The attribute under which every stored record keeps its identifier.
pub const ID_FIELD: &str = "id";

static NULL: Value = Value::Null;

/// A structured attribute map.
pub type Attrs = Map<String, Value>;

/// A normalized record identifier.
///
/// Identifiers are always kept in their string form. Numeric identifiers are converted
/// with their decimal representation, so `RecordId::from(2)` and `RecordId::from("2")`
/// are the same identifier.
///
/// # Example
///
/// ```ignore
/// use mockdb_core::record::RecordId;
///
/// assert_eq!(RecordId::from(2), RecordId::from("2"));
/// assert_eq!(RecordId::from(2).as_str(), "2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Normalizes a JSON value into an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRecord`] if the value is not a string or a number.
    pub fn from_value(value: &Value) -> DbResult<Self> {
        match value {
            Value::String(id) => Ok(RecordId(id.clone())),
            Value::Number(id) => Ok(RecordId(id.to_string())),
            other => Err(DbError::InvalidRecord(format!(
                "record ids must be strings or numbers, got {other}"
            ))),
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier as an integer if it is a base-10 sequence number.
    pub fn as_sequence(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// Returns the JSON form of the identifier (always a string).
    pub fn to_value(&self) -> Value {
        Value::String(self.0.clone())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId(id)
    }
}

impl From<&String> for RecordId {
    fn from(id: &String) -> Self {
        RecordId(id.clone())
    }
}

impl From<&RecordId> for RecordId {
    fn from(id: &RecordId) -> Self {
        id.clone()
    }
}

macro_rules! record_id_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RecordId {
                fn from(id: $ty) -> Self {
                    RecordId(id.to_string())
                }
            }
        )*
    };
}

record_id_from_int!(i32, i64, u32, u64, usize);

/// A single raw record: a JSON object of attributes.
///
/// Records are plain values. Cloning a record produces a fully independent structural
/// copy, which is how the store keeps its internal state isolated from callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Attrs);

impl Record {
    /// Creates an empty record with no attributes.
    pub fn new() -> Self {
        Record(Attrs::new())
    }

    /// Creates a record from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRecord`] if the value is not a JSON object.
    pub fn from_value(value: Value) -> DbResult<Self> {
        match value {
            Value::Object(attrs) => Ok(Record(attrs)),
            other => Err(DbError::InvalidRecord(format!("expected a JSON object, got {other}"))),
        }
    }

    /// Creates a record by serializing any `Serialize` value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the value does not serialize to an object.
    pub fn from_serialize<T: Serialize>(value: &T) -> DbResult<Self> {
        Record::from_value(to_value(value)?)
    }

    /// Deserializes this record into a concrete type.
    ///
    /// # Errors
    ///
    /// Returns an error if the record's shape does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> DbResult<T> {
        Ok(from_value(Value::Object(self.0.clone()))?)
    }

    /// Returns the record's identifier, if it carries one.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRecord`] if the `id` attribute is neither a string nor a
    /// number.
    pub fn record_id(&self) -> DbResult<Option<RecordId>> {
        match self.0.get(ID_FIELD) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => RecordId::from_value(value).map(Some),
        }
    }

    /// Returns the `id` attribute as a string slice.
    ///
    /// Stored records always have a string id, so this is `Some` for anything read
    /// back from a store.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Sets the `id` attribute to the normalized identifier.
    pub fn set_id(&mut self, id: &RecordId) {
        self.0.insert(ID_FIELD.to_string(), id.to_value());
    }

    /// Returns the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Sets an attribute, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Removes an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Merges the given attributes into this record.
    ///
    /// Named attributes are replaced, all others are kept. The `id` attribute is never
    /// changed by a merge.
    pub fn merge(&mut self, attrs: &Attrs) {
        for (name, value) in attrs {
            if name != ID_FIELD {
                self.0.insert(name.clone(), value.clone());
            }
        }
    }

    /// Returns the attribute map.
    pub fn attrs(&self) -> &Attrs {
        &self.0
    }

    /// Consumes the record and returns the attribute map.
    pub fn into_attrs(self) -> Attrs {
        self.0
    }

    /// Consumes the record and returns it as a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Attrs> for Record {
    fn from(attrs: Attrs) -> Self {
        Record(attrs)
    }
}

impl TryFrom<Value> for Record {
    type Error = DbError;

    fn try_from(value: Value) -> DbResult<Self> {
        Record::from_value(value)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

impl Index<&str> for Record {
    type Output = Value;

    /// Returns the attribute value, or `Value::Null` if it is absent.
    fn index(&self, name: &str) -> &Value {
        self.0.get(name).unwrap_or(&NULL)
    }
}
