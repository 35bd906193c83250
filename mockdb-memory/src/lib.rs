//! In-memory record store for mockdb.
//!
//! This crate provides [`Db`], a single-threaded, in-memory implementation of the
//! [`RecordStore`](mockdb_core::backend::RecordStore) trait. It is meant to stand in for
//! a real backend during development and testing.
//!
//! # Features
//!
//! - **Auto-assigned ids** - Per-collection integer sequences, exposed as strings
//! - **Copy isolation** - Records are copied on the way in and on the way out
//! - **Full query support** - Attribute maps, predicates, and filter expressions
//! - **Seeding and snapshots** - Load collections from JSON and dump them back
//!
//! # Quick Start
//!
//! ```ignore
//! use mockdb_memory::Db;
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Db::new();
//!     let users = db.create_collection("users")?;
//!
//!     let link = users.insert(json!({ "name": "Link" }))?;
//!     assert_eq!(link.id(), Some("1"));
//!
//!     let found = users.find(1)?;
//!     assert_eq!(found, Some(link));
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mockdb_memory;

pub mod collection;
pub mod evaluator;
pub mod store;

pub use collection::DbCollection;
pub use store::{Db, DbBuilder, DbConfig};
