//! A thin model layer over a mockdb record store.
//!
//! A [`Schema`] binds model kinds to store collections. Records read through it come back
//! as [`Model`]s tagged with their kind, and queries returning several records come back
//! as a [`Collection`]. Associations between kinds are declared on a [`ModelDef`] and
//! traversed with [`Model::related`].
//!
//! # Quick Start
//!
//! ```ignore
//! use mockdb_memory::Db;
//! use mockdb_orm::{Association, ModelDef, Schema};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let schema = Schema::builder(Db::new())
//!         .register("user", ModelDef::new().has_many("posts", "post"))
//!         .register(
//!             "post",
//!             ModelDef::new().association(Association::belongs_to("author", "user").foreign_key("user_id")),
//!         )
//!         .build()?;
//!
//!     let link = schema.kind("user")?.create(json!({ "name": "Link" }))?;
//!     schema.kind("post")?.create(json!({ "title": "Hyrule", "user_id": link.id() }))?;
//!
//!     let posts = link.related("posts")?.into_collection();
//!     assert_eq!(posts.map(|posts| posts.len()), Some(1));
//!
//!     Ok(())
//! }
//! ```

pub mod collection;
pub mod inflector;
pub mod model;
pub mod schema;

pub use collection::Collection;
pub use inflector::{DefaultInflector, Inflector};
pub use model::{Association, AssociationKind, Computed, Model, ModelDef, Related};
pub use schema::{ModelQuery, Schema, SchemaBuilder};
