//! Error types and result types for record store and schema operations.
//!
//! Every fallible operation in the workspace returns [`DbResult<T>`]. Absence is never
//! reported as an error: singular lookups return `Ok(None)` and queries that match nothing
//! return an empty sequence.

use std::convert::Infallible;

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with the record store
/// or the model layer on top of it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// The named collection has not been created in the store.
    #[error("Collection not found: {0}")]
    UnknownCollection(String),
    /// A collection with the given name already exists.
    #[error("Collection {0} already exists")]
    DuplicateCollection(String),
    /// A record with the given ID already exists in the collection.
    #[error("Record {id} already exists in collection {collection}")]
    DuplicateId {
        id: String,
        collection: String,
    },
    /// Every integer id of the collection is taken.
    #[error("No ids left to assign in collection {0}")]
    IdSpaceExhausted(String),
    /// A batch lookup did not find every requested ID.
    #[error("Couldn't find all {collection} with ids: {}", missing.join(","))]
    PartialResult {
        collection: String,
        missing: Vec<String>,
    },
    /// No model kind is registered under the given name.
    #[error("Model not registered: {0}")]
    UnknownModel(String),
    /// The model kind (or the collection it maps to) is already registered.
    #[error("Model {0} is already registered")]
    DuplicateModel(String),
    /// The model kind declares no association with the given name.
    #[error("Model {kind} has no association named {name}")]
    UnknownAssociation {
        kind: String,
        name: String,
    },
    /// The model has never been saved, so it has no stored record.
    #[error("Model {0} has not been saved yet")]
    UnsavedModel(String),
    /// A stored record that was expected to exist is gone.
    #[error("Record not found {id} in collection {collection}")]
    RecordNotFound {
        id: String,
        collection: String,
    },
    /// The value is not a valid record, identifier, or seed.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    /// Serialization/deserialization error when converting to or from JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The store was accessed while it was already mutably borrowed, for example from
    /// inside a query predicate.
    #[error("Re-entrant store access: {0}")]
    Reentrant(&'static str),
}

/// A specialized `Result` type for record store operations.
pub type DbResult<T> = Result<T, DbError>;

impl From<SerdeJsonError> for DbError {
    fn from(err: SerdeJsonError) -> Self {
        DbError::Serialization(err.to_string())
    }
}

impl From<Infallible> for DbError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}
