//! Reading, writing, resetting and watching form state.

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::Form;
use crate::core::FormValues;
use crate::errors::FormError;
use crate::events;
use crate::store::{WatchHandle, WatchOptions, WatchTarget};

impl Form {
    /// Writes a field value and validates it when the field has rules.
    ///
    /// # Errors
    ///
    /// Returns `FormError::UnknownField` if the form has no such field.
    pub fn set_value(&self, name: &str, value: Value) -> Result<(), FormError> {
        self.inner.store.write(name, value.clone())?;
        if let Some(rules) = self.rules_for(name) {
            self.validate_value(name, Some(&value), &rules);
        }
        Ok(())
    }

    /// Current value of a field, or `None` for an unknown field.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<Value> {
        self.inner.store.values().get(name)
    }

    /// Resets one field, or the whole form when `name` is `None`.
    ///
    /// A field goes back to its default value (`null` when it has none) and
    /// its error is cleared. A whole-form reset also forgets every recorded
    /// rule set.
    ///
    /// # Errors
    ///
    /// Returns `FormError::UnknownField` when resetting a field the form
    /// does not have.
    pub fn reset(&self, name: Option<&str>) -> Result<(), FormError> {
        let store = &self.inner.store;
        match name {
            Some(name) => {
                store.write(name, self.default_of(name))?;
                store.errors().reset(name);
                debug!(form = %self.inner.config.name, field = name, "Field reset");
            }
            None => {
                let keys = store.values().keys();
                let restored: FormValues = keys
                    .iter()
                    .map(|key| (key.clone(), self.default_of(key)))
                    .collect();
                store.replace_all(restored);
                for key in &keys {
                    store.errors().reset(key.as_str());
                }
                self.inner.registry.write().clear();
                debug!(form = %self.inner.config.name, field_count = keys.len(), "Form reset");
            }
        }
        self.emit(events::RESET, json!({ "field": name }));
        Ok(())
    }

    /// Snapshot of every value.
    #[must_use]
    pub fn values(&self) -> FormValues {
        self.inner.store.values().snapshot()
    }

    /// Snapshot of the error bag, including cleared (`None`) entries.
    #[must_use]
    pub fn errors(&self) -> BTreeMap<String, Option<String>> {
        self.inner.store.errors().snapshot()
    }

    /// Current error message of a field.
    #[must_use]
    pub fn error(&self, name: &str) -> Option<String> {
        self.inner.store.errors().get(name)
    }

    /// Returns true if any field currently has an error message.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.inner.store.errors().has_errors()
    }

    /// Watches one field or the whole form.
    ///
    /// Field watchers receive `(new, old)` field values; whole-form watchers
    /// receive bag snapshots as JSON objects. Watching a target that already
    /// has a watcher replaces it.
    pub fn watch<F>(
        &self,
        target: impl Into<WatchTarget>,
        options: WatchOptions,
        callback: F,
    ) -> WatchHandle
    where
        F: Fn(&Value, Option<&Value>) + Send + Sync + 'static,
    {
        self.inner
            .store
            .watch(target.into(), options, Arc::new(callback))
    }

    fn default_of(&self, name: &str) -> Value {
        self.inner.defaults.get(name).cloned().unwrap_or(Value::Null)
    }
}
