//! Record store abstraction.
//!
//! The [`RecordStore`] trait is the seam between the model layer and the storage engine.
//! The model layer only ever talks to a `dyn RecordStore`, so it does not depend on any
//! particular implementation.
//!
//! # Contract
//!
//! - Every record handed in is copied; every record handed out is a copy. Callers can
//!   never alias the store's internal state.
//! - Every record handed out carries a string `id`.
//! - Operations on a collection that has not been created fail with
//!   [`DbError::UnknownCollection`](crate::error::DbError::UnknownCollection), except
//!   where an implementation documents auto-creation on insert.
//! - Singular lookups return `Ok(None)` when nothing matches; queries return an empty
//!   `Vec`.
//!
//! # Examples
//!
//! ```ignore
//! use mockdb_core::backend::RecordStore;
//! use mockdb_core::record::{Record, RecordId};
//! use serde_json::json;
//!
//! let store = MyStore::new();
//! store.create_collection("users")?;
//!
//! let stored = store.insert_records("users", vec![Record::from_value(json!({ "name": "Link" }))?])?;
//! assert_eq!(stored[0].id(), Some("1"));
//! # Ok::<(), mockdb_core::error::DbError>(())
//! ```

use std::fmt::Debug;

use crate::{
    error::DbResult,
    query::Where,
    record::{Attrs, Record, RecordId},
};

/// Abstract interface for record storage backends.
///
/// Implementations are single-threaded and synchronous: every method runs to completion
/// before returning and never blocks.
pub trait RecordStore: Debug {
    /// Registers an empty collection.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCollection` if a collection with this name already exists.
    fn create_collection(&self, name: &str) -> DbResult<()>;

    /// Removes a collection and all its records.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCollection` if the collection does not exist.
    fn drop_collection(&self, name: &str) -> DbResult<()>;

    /// Returns whether a collection with this name exists.
    fn has_collection(&self, name: &str) -> bool;

    /// Lists the names of all collections, sorted.
    fn list_collections(&self) -> Vec<String>;

    /// Inserts records, assigning ids to those that lack one.
    ///
    /// The batch is validated before anything is stored: if any record is invalid or
    /// carries an id that is already taken, nothing is inserted.
    ///
    /// # Returns
    ///
    /// Copies of the stored records, in input order, with normalized string ids.
    fn insert_records(&self, collection: &str, records: Vec<Record>) -> DbResult<Vec<Record>>;

    /// Retrieves a single record by id.
    fn get_record(&self, collection: &str, id: &RecordId) -> DbResult<Option<Record>>;

    /// Retrieves records by id, in request order.
    ///
    /// # Errors
    ///
    /// Returns `PartialResult` unless every requested id was found.
    fn get_records(&self, collection: &str, ids: &[RecordId]) -> DbResult<Vec<Record>>;

    /// Returns every record in insertion order.
    fn all_records(&self, collection: &str) -> DbResult<Vec<Record>>;

    /// Returns the first record in insertion order.
    fn first_record(&self, collection: &str) -> DbResult<Option<Record>>;

    /// Returns every record matching the query, in store order.
    fn query_records(&self, collection: &str, query: &Where) -> DbResult<Vec<Record>>;

    /// Merges attributes into the record with this id.
    ///
    /// # Returns
    ///
    /// The updated record, or `None` if no record has this id.
    fn update_record(
        &self,
        collection: &str,
        id: &RecordId,
        attrs: &Attrs,
    ) -> DbResult<Option<Record>>;

    /// Merges attributes into every record matching the query.
    fn update_records(&self, collection: &str, query: &Where, attrs: &Attrs) -> DbResult<Vec<Record>>;

    /// Removes the record with this id.
    ///
    /// # Returns
    ///
    /// The removed record, or `None` if no record has this id.
    fn remove_record(&self, collection: &str, id: &RecordId) -> DbResult<Option<Record>>;

    /// Removes every record matching the query and returns them.
    fn remove_records(&self, collection: &str, query: &Where) -> DbResult<Vec<Record>>;
}

/// Factory trait for record stores that need configuration before use.
pub trait RecordStoreBuilder {
    /// The store type produced by this builder.
    type Store: RecordStore;

    /// Builds the configured store.
    fn build(self) -> DbResult<Self::Store>;
}
