//! Convenient re-exports of commonly used types from mockdb.
//!
//! ```ignore
//! use mockdb::prelude::*;
//! ```
//!
//! This provides access to:
//! - The in-memory store and its builder
//! - Records, ids and queries
//! - Schemas, models and model collections
//! - Error types

pub use mockdb_core::{
    backend::{RecordStore, RecordStoreBuilder},
    error::{DbError, DbResult},
    query::{Expr, FieldOp, Filter, QueryVisitor, Where},
    record::{Attrs, Record, RecordId},
};
pub use mockdb_memory::{Db, DbBuilder, DbCollection, DbConfig};
pub use mockdb_orm::{
    Association, AssociationKind, Collection, DefaultInflector, Inflector, Model, ModelDef,
    ModelQuery, Related, Schema, SchemaBuilder,
};
