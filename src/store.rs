use std::collections::BTreeMap;

use crate::models::{Film, User};

pub trait Record: Clone {
    fn id(&self) -> i64;
}

impl Record for Film {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for User {
    fn id(&self) -> i64 {
        self.id
    }
}

/// One past the largest id in use, or 1 for an empty collection.
pub fn next_id(ids: impl IntoIterator<Item = i64>) -> i64 {
    ids.into_iter().max().map_or(1, |max| max + 1)
}

/// Accepted records of one entity type, keyed by id.
#[derive(Debug)]
pub struct EntityStore<T> {
    records: BTreeMap<i64, T>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self { records: BTreeMap::new() }
    }
}

impl<T: Record> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record under its id, returning the previous one.
    pub fn insert(&mut self, record: T) -> Option<T> {
        self.records.insert(record.id(), record)
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.records.get(&id)
    }

    /// All records in ascending id order.
    pub fn snapshot(&self) -> Vec<T> {
        self.records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn next_id(&self) -> i64 {
        next_id(self.records.keys().copied())
    }
}
