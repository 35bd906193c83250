//! Per-collection handle over a [`Db`].

use mockdb_core::{
    backend::RecordStore,
    error::{DbError, DbResult},
    query::Where,
    record::{Record, RecordId},
};

use crate::store::Db;

/// A named collection with a reference to its store.
///
/// Every method forwards to the store with this collection's name, so a handle to a
/// collection that does not exist is cheap to create but fails with
/// [`DbError::UnknownCollection`] on use.
///
/// Methods that take records accept anything convertible into a [`Record`]: a `Record`,
/// an attribute map, or a `serde_json::Value` object.
#[derive(Debug, Clone)]
pub struct DbCollection<'a> {
    name: String,
    db: &'a Db,
}

fn to_record<R>(record: R) -> DbResult<Record>
where
    R: TryInto<Record>,
    R::Error: Into<DbError>,
{
    record.try_into().map_err(Into::into)
}

impl<'a> DbCollection<'a> {
    pub(crate) fn new(name: String, db: &'a Db) -> Self {
        Self { name, db }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts one record, assigning the next id if it has none.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DuplicateId`] if the record's explicit id is taken.
    pub fn insert<R>(&self, record: R) -> DbResult<Record>
    where
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        let mut stored = self.db.insert_records(&self.name, vec![to_record(record)?])?;

        stored
            .pop()
            .ok_or_else(|| DbError::InvalidRecord(format!("insert into {} stored nothing", self.name)))
    }

    /// Inserts several records in order. Either all of them are stored or none is.
    pub fn insert_many<R, I>(&self, records: I) -> DbResult<Vec<Record>>
    where
        I: IntoIterator<Item = R>,
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        let records = records
            .into_iter()
            .map(to_record)
            .collect::<DbResult<Vec<_>>>()?;

        self.db.insert_records(&self.name, records)
    }

    /// Finds a record by id. Numeric and string ids are interchangeable.
    pub fn find(&self, id: impl Into<RecordId>) -> DbResult<Option<Record>> {
        self.db.get_record(&self.name, &id.into())
    }

    /// Finds records by id, in request order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::PartialResult`] unless every id was found.
    pub fn find_many<U>(&self, ids: impl IntoIterator<Item = U>) -> DbResult<Vec<Record>>
    where
        U: Into<RecordId>,
    {
        let ids = ids.into_iter().map(Into::into).collect::<Vec<_>>();

        self.db.get_records(&self.name, &ids)
    }

    /// Returns every record matching the query, in store order.
    pub fn filter(&self, query: impl Into<Where>) -> DbResult<Vec<Record>> {
        self.db.query_records(&self.name, &query.into())
    }

    /// Returns the first record matching the query.
    pub fn find_by(&self, query: impl Into<Where>) -> DbResult<Option<Record>> {
        Ok(self.filter(query)?.into_iter().next())
    }

    /// Returns the first record in insertion order.
    pub fn first(&self) -> DbResult<Option<Record>> {
        self.db.first_record(&self.name)
    }

    /// Returns every record in insertion order.
    pub fn all(&self) -> DbResult<Vec<Record>> {
        self.db.all_records(&self.name)
    }

    /// Returns the number of records.
    pub fn len(&self) -> DbResult<usize> {
        Ok(self.all()?.len())
    }

    /// Returns whether the collection holds no records.
    pub fn is_empty(&self) -> DbResult<bool> {
        Ok(self.first()?.is_none())
    }

    /// Merges attributes into the record with this id; `None` if there is no such record.
    pub fn update<R>(&self, id: impl Into<RecordId>, attrs: R) -> DbResult<Option<Record>>
    where
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        self.db.update_record(&self.name, &id.into(), to_record(attrs)?.attrs())
    }

    /// Merges attributes into every record matching the query.
    pub fn update_where<R>(&self, query: impl Into<Where>, attrs: R) -> DbResult<Vec<Record>>
    where
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        self.db.update_records(&self.name, &query.into(), to_record(attrs)?.attrs())
    }

    /// Merges attributes into every record.
    pub fn update_all<R>(&self, attrs: R) -> DbResult<Vec<Record>>
    where
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        self.update_where(Where::predicate(|_| true), attrs)
    }

    /// Removes the record with this id; `None` if there is no such record.
    pub fn remove(&self, id: impl Into<RecordId>) -> DbResult<Option<Record>> {
        self.db.remove_record(&self.name, &id.into())
    }

    /// Removes every record matching the query.
    pub fn remove_where(&self, query: impl Into<Where>) -> DbResult<Vec<Record>> {
        self.db.remove_records(&self.name, &query.into())
    }

    /// Removes every record. The id sequence is not reset.
    pub fn remove_all(&self) -> DbResult<Vec<Record>> {
        self.remove_where(Where::predicate(|_| true))
    }

    /// Returns the first record whose attributes equal `query`, inserting `query` merged
    /// with `extra` if there is none.
    pub fn first_or_create<Q, R>(&self, query: Q, extra: R) -> DbResult<Record>
    where
        Q: TryInto<Record>,
        Q::Error: Into<DbError>,
        R: TryInto<Record>,
        R::Error: Into<DbError>,
    {
        let query = to_record(query)?;

        if let Some(found) = self.find_by(Where::Attrs(query.attrs().clone()))? {
            return Ok(found);
        }

        let mut record = query;
        for (name, value) in to_record(extra)?.into_attrs() {
            record.insert(name, value);
        }

        self.insert(record)
    }
}
