//! Core types for an embedded, in-memory record store used as a stand-in backend during
//! development and testing.
//!
//! This crate provides:
//!
//! - **Records** ([`record`]) - Raw attribute maps and normalized record identifiers
//! - **Store abstraction** ([`backend`]) - The [`RecordStore`](backend::RecordStore) trait implemented by storage engines
//! - **Queries** ([`query`]) - Attribute-equality, predicate, and filter-expression queries
//! - **Error handling** ([`error`]) - The error taxonomy shared by the store and the model layer
//!
//! # Example
//!
//! ```ignore
//! use mockdb_core::{record::{Record, RecordId}, query::Where};
//! use serde_json::json;
//!
//! let record = Record::from_value(json!({ "id": 1, "name": "Link" }))?;
//! assert_eq!(record.record_id()?, Some(RecordId::from("1")));
//!
//! let query = Where::attrs([("name", "Link")]);
//! # Ok::<(), mockdb_core::error::DbError>(())
//! ```

#[allow(unused_extern_crates)]
extern crate self as mockdb_core;

pub mod backend;
pub mod error;
pub mod query;
pub mod record;
