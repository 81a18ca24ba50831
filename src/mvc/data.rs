//! Request data bags.
//!
//! `ViewData` lives for the current response only. `TempData` is loaded from
//! the flash store when the request starts and whatever is left unread is
//! handed back to the store when the response is built.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::infra::FlashEntries;

/// String-keyed bag of JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBag {
    entries: HashMap<String, Value>,
}

impl DataBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Append a string to the list stored under `key`, creating the list on
    /// first use. A scalar already stored there becomes the list's first
    /// element.
    pub fn push_to_list(&mut self, key: &str, item: impl Into<String>) {
        let slot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));

        if !slot.is_array() {
            tracing::warn!(key = %key, "Converting scalar data entry into a list");
            let previous = slot.take();
            *slot = Value::Array(vec![previous]);
        }

        if let Value::Array(items) = slot {
            items.push(Value::String(item.into()));
        }
    }

    /// Strings stored in the list under `key`, in insertion order.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.entries.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.to_string()],
        }
    }

    fn into_entries(self) -> HashMap<String, Value> {
        self.entries
    }
}

impl From<FlashEntries> for DataBag {
    fn from(entries: FlashEntries) -> Self {
        Self { entries }
    }
}

/// Data for the view rendered in the current response.
#[derive(Debug, Clone, Default)]
pub struct ViewData {
    /// Model bound for the view being rendered
    pub model: Option<Value>,
    bag: DataBag,
}

impl ViewData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bag(&self) -> &DataBag {
        &self.bag
    }

    pub fn bag_mut(&mut self) -> &mut DataBag {
        &mut self.bag
    }
}

/// Data carried across exactly one request boundary.
///
/// Reading an entry marks it consumed; consumed entries are not carried to
/// the next request. Entries that are never read are carried again.
#[derive(Debug, Clone, Default)]
pub struct TempData {
    bag: DataBag,
    consumed: HashSet<String>,
}

impl TempData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap entries taken from the flash store at request start.
    pub fn from_incoming(entries: FlashEntries) -> Self {
        Self {
            bag: DataBag::from(entries),
            consumed: HashSet::new(),
        }
    }

    /// Read an entry and mark it consumed.
    pub fn get(&mut self, key: &str) -> Option<&Value> {
        if self.bag.contains_key(key) {
            self.consumed.insert(key.to_string());
        }
        self.bag.get(key)
    }

    /// Read an entry without consuming it.
    pub fn peek(&self, key: &str) -> Option<&Value> {
        self.bag.get(key)
    }

    /// Read a string list and mark it consumed.
    pub fn take_list(&mut self, key: &str) -> Vec<String> {
        if self.bag.contains_key(key) {
            self.consumed.insert(key.to_string());
        }
        self.bag.list(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.consumed.remove(&key);
        self.bag.set(key, value);
    }

    /// Append to the list under `key`; the list is unread afterwards.
    pub fn push_to_list(&mut self, key: &str, item: impl Into<String>) {
        self.consumed.remove(key);
        self.bag.push_to_list(key, item);
    }

    /// Carry a consumed entry to the next request anyway.
    pub fn keep(&mut self, key: &str) {
        self.consumed.remove(key);
    }

    pub fn is_empty(&self) -> bool {
        self.bag.is_empty()
    }

    /// Entries to hand back to the flash store.
    pub fn into_carried(self) -> FlashEntries {
        let consumed = self.consumed;
        self.bag
            .into_entries()
            .into_iter()
            .filter(|(key, _)| !consumed.contains(key))
            .collect()
    }
}

/// Response extension with the carried-over entries produced by a handler.
///
/// The flash middleware removes it from the response and persists it.
#[derive(Debug, Clone, Default)]
pub struct CarriedOver(pub FlashEntries);
