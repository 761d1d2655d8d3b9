use indexmap::IndexMap;
use thiserror::Error;

use crate::domain::Record;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("record has no value for identifier '{0}'")]
    MissingKey(String),
    #[error("a record with key '{0}' already exists")]
    DuplicateKey(String),
    #[error("no record with key '{0}'")]
    UnknownKey(String),
}

/// Ordered records of one kind, unique by identifier field.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCollection {
    id_key: String,
    entries: IndexMap<String, Record>,
}

impl RecordCollection {
    pub fn new(id_key: impl Into<String>) -> Self {
        Self {
            id_key: id_key.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn from_records(
        id_key: impl Into<String>,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<Self, CollectionError> {
        let mut collection = Self::new(id_key);
        for record in records {
            collection.insert(record)?;
        }
        Ok(collection)
    }

    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    pub fn key_of(&self, record: &Record) -> Result<String, CollectionError> {
        let key = record.text(&self.id_key);
        if key.trim().is_empty() {
            Err(CollectionError::MissingKey(self.id_key.clone()))
        } else {
            Ok(key)
        }
    }

    pub fn insert(&mut self, record: Record) -> Result<String, CollectionError> {
        let key = self.key_of(&record)?;
        if self.entries.contains_key(&key) {
            return Err(CollectionError::DuplicateKey(key));
        }
        self.entries.insert(key.clone(), record);
        Ok(key)
    }

    /// Replaces the entry stored under `key` in place. A record whose
    /// identifier changed is re-keyed at the same position.
    pub fn replace(&mut self, key: &str, record: Record) -> Result<String, CollectionError> {
        let new_key = self.key_of(&record)?;
        let Some(index) = self.entries.get_index_of(key) else {
            return Err(CollectionError::UnknownKey(key.to_string()));
        };
        if new_key != key && self.entries.contains_key(&new_key) {
            return Err(CollectionError::DuplicateKey(new_key));
        }
        if new_key == key {
            self.entries.insert(new_key.clone(), record);
        } else {
            self.entries.shift_remove_index(index);
            self.entries.shift_insert(index, new_key.clone(), record);
        }
        Ok(new_key)
    }

    /// Removes one entry, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Record> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &Record)> {
        self.entries
            .get_index(index)
            .map(|(key, record)| (key.as_str(), record))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.entries.values().cloned().collect()
    }
}
