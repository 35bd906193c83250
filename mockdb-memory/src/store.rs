//! In-memory record store.
//!
//! [`Db`] keeps named collections of records in insertion order and assigns each
//! collection its own sequence of integer ids. It is a cheap, cloneable handle: every
//! clone shares the same underlying data, and every record that crosses the handle is a
//! structural copy.

use std::{
    cell::{Ref, RefCell, RefMut},
    collections::{BTreeMap, HashSet},
    rc::Rc,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use mockdb_core::{
    backend::{RecordStore, RecordStoreBuilder},
    error::{DbError, DbResult},
    query::Where,
    record::{Attrs, Record, RecordId},
};

use crate::{collection::DbCollection, evaluator::RecordEvaluator};

/// Records of one collection plus its id allocator.
#[derive(Debug)]
struct StoredCollection {
    records: Vec<Record>,
    /// Next auto-assigned id. Only ever grows, so removed ids are never reused.
    next_id: u64,
}

impl Default for StoredCollection {
    fn default() -> Self {
        Self { records: Vec::new(), next_id: 1 }
    }
}

impl StoredCollection {
    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.id() == Some(id.as_str()))
    }

    fn get(&self, id: &RecordId) -> Option<&Record> {
        self.position(id).map(|position| &self.records[position])
    }

    /// Assigns ids to the batch and stores it. Nothing is stored unless the whole batch
    /// is valid.
    fn insert(&mut self, name: &str, records: Vec<Record>) -> DbResult<Vec<Record>> {
        let mut taken = self
            .records
            .iter()
            .filter_map(|record| record.id().map(str::to_string))
            .collect::<HashSet<_>>();
        let mut next_id = self.next_id;
        let mut prepared = Vec::with_capacity(records.len());

        for mut record in records {
            let id = match record.record_id()? {
                Some(id) => {
                    if taken.contains(id.as_str()) {
                        return Err(DbError::DuplicateId {
                            id: id.to_string(),
                            collection: name.to_string(),
                        });
                    }

                    if let Some(sequence) = id.as_sequence() {
                        next_id = next_id.max(sequence.saturating_add(1));
                    }

                    id
                }
                None => {
                    while taken.contains(&next_id.to_string()) {
                        next_id = next_id
                            .checked_add(1)
                            .ok_or_else(|| DbError::IdSpaceExhausted(name.to_string()))?;
                    }

                    // Stays at u64::MAX once reached; the taken check above then fails.
                    let id = RecordId::from(next_id);
                    next_id = next_id.saturating_add(1);
                    id
                }
            };

            record.set_id(&id);
            taken.insert(id.to_string());
            prepared.push(record);
        }

        self.next_id = next_id;
        self.records.extend(prepared.iter().cloned());

        for record in &prepared {
            trace!(collection = name, id = record.id(), "inserted record");
        }

        Ok(prepared)
    }

    fn positions(&self, query: &Where) -> Vec<usize> {
        RecordEvaluator::matching_positions(&self.records, query)
    }

    fn clear(&mut self) {
        self.records.clear();
        self.next_id = 1;
    }
}

type CollectionMap = BTreeMap<String, StoredCollection>;

/// Configuration for a [`Db`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Create a collection on first insert instead of failing with
    /// [`DbError::UnknownCollection`].
    pub auto_create_collections: bool,
}

/// Single-threaded in-memory record store.
///
/// `Db` implements [`RecordStore`] and adds convenience methods for seeding, dumping and
/// per-collection access through [`DbCollection`].
///
/// # Sharing
///
/// `Db` is cloneable and uses an `Rc`-wrapped internal state. Clones share the same
/// underlying data. The store is not `Send`: it is meant to live inside one test or
/// session.
///
/// # Performance
///
/// Lookups and queries scan the whole collection (no indexing).
///
/// # Example
///
/// ```ignore
/// use mockdb_memory::Db;
/// use serde_json::json;
///
/// let db = Db::from_seed(json!({
///     "users": [{ "id": 1, "name": "Link" }, { "id": 2, "name": "Zelda" }],
/// }))?;
///
/// let zelda = db.collection("users").find(2)?.unwrap();
/// assert_eq!(zelda.into_value(), json!({ "id": "2", "name": "Zelda" }));
/// # Ok::<(), mockdb_core::error::DbError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Db {
    /// collection_name -> records
    collections: Rc<RefCell<CollectionMap>>,
    config: DbConfig,
}

impl Db {
    /// Creates a new empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DbConfig::default())
    }

    /// Creates a new empty store with the given configuration.
    pub fn with_config(config: DbConfig) -> Self {
        Self {
            collections: Rc::new(RefCell::new(CollectionMap::new())),
            config,
        }
    }

    /// Creates a builder for constructing a `Db` with custom options.
    pub fn builder() -> DbBuilder {
        DbBuilder::default()
    }

    /// Creates a store seeded from a JSON object mapping collection names to arrays of
    /// records.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRecord`] if the seed is malformed, or
    /// [`DbError::DuplicateId`] if a seeded collection repeats an id.
    pub fn from_seed(seed: Value) -> DbResult<Self> {
        let db = Self::new();
        db.load(seed)?;

        Ok(db)
    }

    /// Returns the store configuration.
    pub fn config(&self) -> DbConfig {
        self.config
    }

    /// Loads seed data, creating any collection that does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRecord`] if the seed is not an object of arrays of
    /// objects. Collections seeded before the failing one keep their data.
    pub fn load(&self, seed: Value) -> DbResult<()> {
        let Value::Object(seed) = seed else {
            return Err(DbError::InvalidRecord(
                "seed data must be an object mapping collection names to arrays".to_string(),
            ));
        };

        for (name, records) in seed {
            let Value::Array(records) = records else {
                return Err(DbError::InvalidRecord(format!(
                    "seed data for {name} must be an array of records"
                )));
            };

            let records = records
                .into_iter()
                .map(Record::from_value)
                .collect::<DbResult<Vec<_>>>()?;

            if !self.has_collection(&name) {
                self.create_collection(&name)?;
            }

            debug!(collection = %name, count = records.len(), "seeding collection");
            self.insert_records(&name, records)?;
        }

        Ok(())
    }

    /// Gets a handle to the collection with the given name.
    ///
    /// The handle does not check that the collection exists; its operations do.
    pub fn collection(&self, name: &str) -> DbCollection<'_> {
        DbCollection::new(name.to_string(), self)
    }

    /// Registers an empty collection and returns a handle to it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateCollection`] if the name is taken.
    pub fn create_collection(&self, name: &str) -> DbResult<DbCollection<'_>> {
        RecordStore::create_collection(self, name)?;

        Ok(self.collection(name))
    }

    /// Registers several empty collections.
    ///
    /// # Errors
    ///
    /// Fails on the first name that is already taken.
    pub fn create_collections<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> DbResult<()> {
        for name in names {
            RecordStore::create_collection(self, name)?;
        }

        Ok(())
    }

    /// Returns the names of all collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        self.list_collections()
    }

    /// Removes every record from every collection and resets the id sequences, keeping
    /// the collections themselves.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Reentrant`] if called while the store is borrowed.
    pub fn empty_data(&self) -> DbResult<()> {
        let mut collections = self.write("empty_data")?;

        for collection in collections.values_mut() {
            collection.clear();
        }

        debug!("emptied all collections");

        Ok(())
    }

    /// Returns a JSON snapshot of every collection.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Reentrant`] if called while the store is mutably borrowed.
    pub fn dump(&self) -> DbResult<Value> {
        let collections = self.read("dump")?;

        Ok(Value::Object(
            collections
                .iter()
                .map(|(name, collection)| {
                    (
                        name.clone(),
                        Value::Array(
                            collection
                                .records
                                .iter()
                                .cloned()
                                .map(Record::into_value)
                                .collect(),
                        ),
                    )
                })
                .collect::<Map<_, _>>(),
        ))
    }

    fn read(&self, context: &'static str) -> DbResult<Ref<'_, CollectionMap>> {
        self.collections
            .try_borrow()
            .map_err(|_| DbError::Reentrant(context))
    }

    fn write(&self, context: &'static str) -> DbResult<RefMut<'_, CollectionMap>> {
        self.collections
            .try_borrow_mut()
            .map_err(|_| DbError::Reentrant(context))
    }

    /// Runs `f` against a collection under a shared borrow.
    fn with_collection<T>(
        &self,
        name: &str,
        context: &'static str,
        f: impl FnOnce(&StoredCollection) -> T,
    ) -> DbResult<T> {
        let collections = self.read(context)?;

        collections
            .get(name)
            .map(f)
            .ok_or_else(|| DbError::UnknownCollection(name.to_string()))
    }

    /// Runs `f` against a collection under an exclusive borrow.
    fn with_collection_mut<T>(
        &self,
        name: &str,
        context: &'static str,
        f: impl FnOnce(&mut StoredCollection) -> DbResult<T>,
    ) -> DbResult<T> {
        let mut collections = self.write(context)?;

        match collections.get_mut(name) {
            Some(collection) => f(collection),
            None => Err(DbError::UnknownCollection(name.to_string())),
        }
    }
}

impl RecordStore for Db {
    fn create_collection(&self, name: &str) -> DbResult<()> {
        let mut collections = self.write("create_collection")?;

        if collections.contains_key(name) {
            return Err(DbError::DuplicateCollection(name.to_string()));
        }

        collections.insert(name.to_string(), StoredCollection::default());
        debug!(collection = name, "created collection");

        Ok(())
    }

    fn drop_collection(&self, name: &str) -> DbResult<()> {
        let mut collections = self.write("drop_collection")?;

        if collections.remove(name).is_none() {
            return Err(DbError::UnknownCollection(name.to_string()));
        }

        debug!(collection = name, "dropped collection");

        Ok(())
    }

    fn has_collection(&self, name: &str) -> bool {
        self.collections
            .try_borrow()
            .map(|collections| collections.contains_key(name))
            .unwrap_or(false)
    }

    fn list_collections(&self) -> Vec<String> {
        self.collections
            .try_borrow()
            .map(|collections| collections.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn insert_records(&self, collection: &str, records: Vec<Record>) -> DbResult<Vec<Record>> {
        let mut collections = self.write("insert_records")?;

        if !collections.contains_key(collection) {
            if !self.config.auto_create_collections {
                return Err(DbError::UnknownCollection(collection.to_string()));
            }

            debug!(collection, "auto-creating collection on insert");
            collections.insert(collection.to_string(), StoredCollection::default());
        }

        match collections.get_mut(collection) {
            Some(stored) => stored.insert(collection, records),
            None => Err(DbError::UnknownCollection(collection.to_string())),
        }
    }

    fn get_record(&self, collection: &str, id: &RecordId) -> DbResult<Option<Record>> {
        self.with_collection(collection, "get_record", |stored| stored.get(id).cloned())
    }

    fn get_records(&self, collection: &str, ids: &[RecordId]) -> DbResult<Vec<Record>> {
        let (found, missing) = self.with_collection(collection, "get_records", |stored| {
            let mut found = Vec::with_capacity(ids.len());
            let mut missing = Vec::new();

            for id in ids {
                match stored.get(id) {
                    Some(record) => found.push(record.clone()),
                    None => missing.push(id.to_string()),
                }
            }

            (found, missing)
        })?;

        if !missing.is_empty() {
            warn!(collection, ?missing, "batch lookup did not find every id");

            return Err(DbError::PartialResult {
                collection: collection.to_string(),
                missing,
            });
        }

        Ok(found)
    }

    fn all_records(&self, collection: &str) -> DbResult<Vec<Record>> {
        self.with_collection(collection, "all_records", |stored| stored.records.clone())
    }

    fn first_record(&self, collection: &str) -> DbResult<Option<Record>> {
        self.with_collection(collection, "first_record", |stored| stored.records.first().cloned())
    }

    fn query_records(&self, collection: &str, query: &Where) -> DbResult<Vec<Record>> {
        self.with_collection(collection, "query_records", |stored| {
            stored
                .positions(query)
                .into_iter()
                .map(|position| stored.records[position].clone())
                .collect()
        })
    }

    fn update_record(
        &self,
        collection: &str,
        id: &RecordId,
        attrs: &Attrs,
    ) -> DbResult<Option<Record>> {
        self.with_collection_mut(collection, "update_record", |stored| {
            let Some(position) = stored.position(id) else {
                return Ok(None);
            };

            let record = &mut stored.records[position];
            record.merge(attrs);
            trace!(collection, %id, "updated record");

            Ok(Some(record.clone()))
        })
    }

    fn update_records(&self, collection: &str, query: &Where, attrs: &Attrs) -> DbResult<Vec<Record>> {
        // Predicates run under a shared borrow so they may read the store.
        let positions = self.with_collection(collection, "update_records", |stored| stored.positions(query))?;

        self.with_collection_mut(collection, "update_records", |stored| {
            Ok(positions
                .into_iter()
                .map(|position| {
                    let record = &mut stored.records[position];
                    record.merge(attrs);
                    trace!(collection, id = record.id(), "updated record");
                    record.clone()
                })
                .collect())
        })
    }

    fn remove_record(&self, collection: &str, id: &RecordId) -> DbResult<Option<Record>> {
        self.with_collection_mut(collection, "remove_record", |stored| {
            let removed = stored
                .position(id)
                .map(|position| stored.records.remove(position));

            if removed.is_some() {
                trace!(collection, %id, "removed record");
            }

            Ok(removed)
        })
    }

    fn remove_records(&self, collection: &str, query: &Where) -> DbResult<Vec<Record>> {
        let positions = self.with_collection(collection, "remove_records", |stored| stored.positions(query))?;

        self.with_collection_mut(collection, "remove_records", |stored| {
            let mut removed = positions
                .into_iter()
                .rev()
                .map(|position| stored.records.remove(position))
                .collect::<Vec<_>>();
            removed.reverse();

            trace!(collection, count = removed.len(), "removed records");

            Ok(removed)
        })
    }
}

/// Builder for constructing [`Db`] instances.
///
/// # Example
///
/// ```ignore
/// use mockdb_memory::Db;
/// use mockdb_core::backend::RecordStoreBuilder;
/// use serde_json::json;
///
/// let db = Db::builder()
///     .auto_create_collections(true)
///     .seed(json!({ "users": [{ "name": "Link" }] }))
///     .build()?;
/// # Ok::<(), mockdb_core::error::DbError>(())
/// ```
#[derive(Debug, Default)]
pub struct DbBuilder {
    config: DbConfig,
    seed: Option<Value>,
}

impl DbBuilder {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: DbConfig) -> Self {
        self.config = config;
        self
    }

    /// Creates collections on first insert instead of failing.
    pub fn auto_create_collections(mut self, enabled: bool) -> Self {
        self.config.auto_create_collections = enabled;
        self
    }

    /// Seeds the store with a JSON object mapping collection names to arrays of records.
    pub fn seed(mut self, seed: Value) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl RecordStoreBuilder for DbBuilder {
    type Store = Db;

    fn build(self) -> DbResult<Self::Store> {
        let db = Db::with_config(self.config);

        if let Some(seed) = self.seed {
            db.load(seed)?;
        }

        Ok(db)
    }
}
