//! Value and error bags backing a form.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::FormValues;
use crate::errors::FormError;

/// Keyed store of current field values.
///
/// Keys are fixed when the bag is created; [`ValueBag::ensure_key`] is the
/// only way to add one later. Reads hand out clones.
#[derive(Debug, Default)]
pub struct ValueBag {
    data: RwLock<FormValues>,
}

impl ValueBag {
    /// Creates a new empty value bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a value bag from existing values.
    #[must_use]
    pub fn from_values(values: FormValues) -> Self {
        Self {
            data: RwLock::new(values),
        }
    }

    /// Gets a value from the bag.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.data.read().get(key).cloned()
    }

    /// Checks if a key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Writes a value to an existing key and returns the previous value.
    ///
    /// # Errors
    ///
    /// Returns `FormError::UnknownField` if the key was never declared.
    pub fn set(&self, key: &str, value: Value) -> Result<Value, FormError> {
        let mut data = self.data.write();
        match data.get_mut(key) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(FormError::UnknownField(key.to_string())),
        }
    }

    /// Adds `key` with a `null` value if it is missing.
    ///
    /// Returns true if the key was added.
    pub fn ensure_key(&self, key: &str) -> bool {
        let mut data = self.data.write();
        if data.contains_key(key) {
            return false;
        }
        data.insert(key.to_string(), Value::Null);
        true
    }

    /// Returns a deep copy of all values.
    #[must_use]
    pub fn snapshot(&self) -> FormValues {
        self.data.read().clone()
    }

    /// Returns all keys in field order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if the bag has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Clone for ValueBag {
    fn clone(&self) -> Self {
        Self {
            data: RwLock::new(self.data.read().clone()),
        }
    }
}

/// Keyed store of per-field error messages.
///
/// An entry holding `None` means the field was validated or reset and has no
/// error; a missing entry means the field was never touched.
#[derive(Debug, Default)]
pub struct ErrorBag {
    data: RwLock<BTreeMap<String, Option<String>>>,
}

impl ErrorBag {
    /// Creates a new empty error bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the current message for a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned().flatten()
    }

    /// Checks if an entry exists for a field, with or without a message.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Records an error message for a field.
    pub fn set(&self, key: impl Into<String>, message: impl Into<String>) {
        self.data.write().insert(key.into(), Some(message.into()));
    }

    /// Sets the field's entry to `None`, creating it if needed.
    pub fn reset(&self, key: impl Into<String>) {
        self.data.write().insert(key.into(), None);
    }

    /// Clears the message of an existing entry; missing entries stay missing.
    pub fn clear(&self, key: &str) {
        if let Some(slot) = self.data.write().get_mut(key) {
            *slot = None;
        }
    }

    /// Sets every existing entry to `None`.
    pub fn clear_all(&self) {
        for slot in self.data.write().values_mut() {
            *slot = None;
        }
    }

    /// Returns true if any entry holds a message.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.data.read().values().any(Option::is_some)
    }

    /// Returns only the entries holding a message.
    #[must_use]
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.data
            .read()
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|msg| (k.clone(), msg.clone())))
            .collect()
    }

    /// Returns a copy of all entries.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Option<String>> {
        self.data.read().clone()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if the bag has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}
