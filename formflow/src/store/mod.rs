//! Observable state container for a form.
//!
//! This module provides:
//! - The value bag holding current field values
//! - The error bag holding per-field messages
//! - A watcher registry notified on every value write

mod bags;
mod watch;

pub use bags::{ErrorBag, ValueBag};
pub use watch::{WatchCallback, WatchHandle, WatchOptions, WatchRegistry, WatchTarget};

use serde_json::Value;
use std::sync::Arc;

use crate::core::FormValues;
use crate::errors::FormError;

/// Value bag, error bag and watchers behind one mutation entry point.
///
/// All value writes go through [`FormStore::write`] or
/// [`FormStore::replace_all`] so watchers see every change.
#[derive(Debug, Default)]
pub struct FormStore {
    values: ValueBag,
    errors: ErrorBag,
    watchers: Arc<WatchRegistry>,
}

impl FormStore {
    /// Creates a store seeded with initial values.
    #[must_use]
    pub fn new(initial: FormValues) -> Self {
        Self {
            values: ValueBag::from_values(initial),
            errors: ErrorBag::new(),
            watchers: Arc::new(WatchRegistry::new()),
        }
    }

    /// The value bag (read access).
    #[must_use]
    pub fn values(&self) -> &ValueBag {
        &self.values
    }

    /// The error bag.
    #[must_use]
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// The watcher registry.
    #[must_use]
    pub fn watchers(&self) -> &Arc<WatchRegistry> {
        &self.watchers
    }

    /// Adds a field with a `null` value if it is missing.
    pub fn declare(&self, name: &str) -> bool {
        self.values.ensure_key(name)
    }

    /// Writes one field and notifies watchers.
    ///
    /// # Errors
    ///
    /// Returns `FormError::UnknownField` if the field is not declared.
    pub fn write(&self, name: &str, value: Value) -> Result<(), FormError> {
        let all_before = self.whole_bag_if_watched();
        let old = self.values.set(name, value.clone())?;

        self.watchers
            .notify(&WatchTarget::Field(name.to_string()), &old, &value);
        if let Some(before) = all_before {
            let after = Value::Object(self.values.snapshot());
            self.watchers.notify(&WatchTarget::All, &before, &after);
        }
        Ok(())
    }

    /// Writes several fields and notifies the whole-bag watcher once.
    ///
    /// Unknown keys in `updates` are skipped.
    pub fn replace_all(&self, updates: FormValues) {
        let all_before = self.whole_bag_if_watched();

        for (name, value) in updates {
            if let Ok(old) = self.values.set(&name, value.clone()) {
                self.watchers
                    .notify(&WatchTarget::Field(name), &old, &value);
            }
        }

        if let Some(before) = all_before {
            let after = Value::Object(self.values.snapshot());
            self.watchers.notify(&WatchTarget::All, &before, &after);
        }
    }

    /// Installs a watcher; an existing watcher on the same target is removed
    /// first.
    pub fn watch(
        &self,
        target: WatchTarget,
        options: WatchOptions,
        callback: WatchCallback,
    ) -> WatchHandle {
        let immediate = options.immediate.then(|| Arc::clone(&callback));
        let current = immediate.as_ref().map(|_| self.current(&target));

        let handle = self.watchers.install(target, options, callback);

        if let (Some(callback), Some(current)) = (immediate, current) {
            callback(&current, None);
        }
        handle
    }

    fn current(&self, target: &WatchTarget) -> Value {
        match target {
            WatchTarget::Field(name) => self.values.get(name).unwrap_or(Value::Null),
            WatchTarget::All => Value::Object(self.values.snapshot()),
        }
    }

    fn whole_bag_if_watched(&self) -> Option<Value> {
        self.watchers
            .has_all_watcher()
            .then(|| Value::Object(self.values.snapshot()))
    }
}
