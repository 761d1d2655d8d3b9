use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{Record, RecordSchema};

/// Working copy of one record while a form session is open.
/// May carry keys the schema does not know about (previews, seed extras).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBuffer {
    values: IndexMap<String, Value>,
}

impl EditBuffer {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Projects the buffer onto the schema's fields in declaration order.
    /// Transient keys are dropped; missing fields fall back to their initial value.
    pub fn to_record(&self, schema: &RecordSchema) -> Record {
        schema
            .fields()
            .map(|field| {
                let value = self
                    .values
                    .get(&field.key)
                    .cloned()
                    .unwrap_or_else(|| field.initial_value());
                (field.key.clone(), value)
            })
            .collect()
    }
}

impl FromIterator<(String, Value)> for EditBuffer {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
