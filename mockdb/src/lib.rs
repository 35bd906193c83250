//! Main mockdb crate providing a unified interface to the record store and the model layer.
//!
//! This crate is the entry point for users of mockdb. It re-exports the core types, the
//! in-memory store, and the model layer from their sub-crates.
//!
//! # Features
//!
//! - **In-memory record store** - Named collections with auto-assigned string ids and copy isolation
//! - **Flexible querying** - Attribute maps, predicates, and composable filter expressions
//! - **Model layer** - Kinds registered per schema, with associations and computed accessors
//! - **Seeding** - Load collections from JSON fixtures and dump them back
//!
//! # Quick Start
//!
//! ```ignore
//! use mockdb::{prelude::*, serde_json::json};
//!
//! fn main() -> DbResult<()> {
//!     // Seed a store
//!     let db = Db::from_seed(json!({
//!         "users": [
//!             { "name": "Link" },
//!             { "name": "Zelda" },
//!         ],
//!     }))?;
//!
//!     // Register the kinds the tests care about
//!     let schema = Schema::builder(db)
//!         .register("user", ModelDef::new())
//!         .build()?;
//!
//!     let users = schema.kind("user")?;
//!
//!     assert_eq!(users.all()?.len(), 2);
//!     assert_eq!(users.find(2)?.map(|zelda| zelda["name"].clone()), Some(json!("Zelda")));
//!     assert!(users.filter(Where::eq("name", "Ganon"))?.is_empty());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Raw Access
//!
//! The store can also be used on its own, without a schema. Records then come back as
//! plain attribute maps.
//!
//! ```ignore
//! use mockdb::{prelude::*, serde_json::json};
//!
//! let db = Db::builder().auto_create_collections(true).build()?;
//! let users = db.collection("users");
//!
//! let link = users.insert(json!({ "name": "Link" }))?;
//! users.update(link.id().unwrap_or_default(), json!({ "hearts": 3 }))?;
//!
//! let tough = users.filter(Filter::gte("hearts", 3))?;
//! assert_eq!(tough.len(), 1);
//! # Ok::<(), DbError>(())
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing

pub mod prelude;

pub use mockdb_core::{backend, error, query, record};
pub use mockdb_orm::{collection, inflector, model, schema};

// Re-export JSON types for convenience
pub use serde_json;

/// In-memory storage backend implementations.
pub mod memory {
    pub use mockdb_memory::{Db, DbBuilder, DbCollection, DbConfig};
}
