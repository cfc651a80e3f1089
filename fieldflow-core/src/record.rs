//! Record Interface
//!
//! The engine never talks to a database or an ORM. It requires exactly three
//! capabilities from the host's record type: read a named field, write a
//! named field, and report which fields changed since the last known-good
//! snapshot. The [`Record`] trait captures that surface.
//!
//! [`MapRecord`] is a self-contained implementation backed by an ordered map
//! of JSON values with its own change tracking. It stands in for the host
//! record in tests and benches, and works as-is for hosts that keep records
//! as loose field maps.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A field value. Fields are dynamically typed; a missing field reads as
/// [`Value::Null`].
pub type Value = serde_json::Value;

/// The capability set the engine requires from a host record.
pub trait Record {
    /// Read the current in-memory value of a named field.
    fn get(&self, property: &str) -> Value;

    /// Write a named field's in-memory value.
    fn set(&mut self, property: &str, value: Value);

    /// The set of field names whose value differs from the last persisted or
    /// otherwise known-good snapshot.
    fn changed_properties(&self) -> HashSet<String>;
}

/// An in-memory record: an ordered map of fields plus a changed-field set.
///
/// A write through [`Record::set`] marks the field changed only when the new
/// value actually differs from the current one. [`MapRecord::commit`] clears
/// the changed set, playing the role of the host's persistence boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapRecord {
    values: IndexMap<String, Value>,
    #[serde(skip)]
    changed: HashSet<String>,
}

impl MapRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every field clean, as if the record had just been persisted.
    pub fn commit(&mut self) {
        self.changed.clear();
    }

    /// Whether any field differs from the last commit.
    pub fn is_changed(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Iterate over all fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Record for MapRecord {
    fn get(&self, property: &str) -> Value {
        self.values.get(property).cloned().unwrap_or(Value::Null)
    }

    fn set(&mut self, property: &str, value: Value) {
        if self.values.get(property) == Some(&value) {
            return;
        }
        self.values.insert(property.to_owned(), value);
        self.changed.insert(property.to_owned());
    }

    fn changed_properties(&self) -> HashSet<String> {
        self.changed.clone()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapRecord {
    /// Build a record from initial field values. The result starts with every
    /// built field marked changed; call [`MapRecord::commit`] first when the
    /// values represent already-persisted state.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.set(&k.into(), v.into());
        }
        record
    }
}
