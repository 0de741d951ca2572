//! Field registration.

use serde_json::Value;
use std::fmt;
use tracing::debug;

use super::Form;
use crate::errors::FormError;
use crate::rules::FieldRules;

impl Form {
    /// Registers a field and returns its input binding.
    ///
    /// When `rules` is given they are recorded for full validation; a field
    /// registered again keeps its original position in the validation order.
    /// A field missing from the defaults is added with a `null` value.
    pub fn register(&self, name: &str, rules: Option<FieldRules>) -> FieldBinding {
        if self.inner.store.declare(name) {
            debug!(form = %self.inner.config.name, field = name, "Declared field outside defaults");
        }
        if let Some(rules) = &rules {
            self.inner.registry.write().register(name, rules.clone());
        }

        FieldBinding {
            form: self.clone(),
            name: name.to_string(),
            rules,
        }
    }
}

/// Input binding for one registered field.
///
/// The rules captured at registration drive `on_input`/`on_blur`, even after
/// a full reset clears the form's registry.
#[derive(Clone)]
pub struct FieldBinding {
    form: Form,
    name: String,
    rules: Option<FieldRules>,
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl FieldBinding {
    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value of the field.
    #[must_use]
    pub fn value(&self) -> Value {
        self.form.get_value(&self.name).unwrap_or(Value::Null)
    }

    /// The rules captured at registration.
    #[must_use]
    pub fn rules(&self) -> Option<&FieldRules> {
        self.rules.as_ref()
    }

    /// Handles user input: writes the value, clears the field's error and
    /// validates when the field has rules.
    ///
    /// Returns the validation result, or `true` when nothing was validated.
    ///
    /// # Errors
    ///
    /// Returns `FormError::UnknownField` if the field no longer exists.
    pub fn on_input(&self, value: Value) -> Result<bool, FormError> {
        let inner = &self.form.inner;
        inner.store.write(&self.name, value.clone())?;
        inner.store.errors().reset(self.name.as_str());

        match &self.rules {
            Some(rules) if inner.config.validate_on_input => {
                Ok(self.form.validate_value(&self.name, Some(&value), rules))
            }
            _ => Ok(true),
        }
    }

    /// Handles focus loss: validates `value` when the field has rules.
    ///
    /// The value bag is never written.
    pub fn on_blur(&self, value: &Value) -> bool {
        match &self.rules {
            Some(rules) if self.form.inner.config.validate_on_blur => {
                self.form.validate_value(&self.name, Some(value), rules)
            }
            _ => true,
        }
    }
}
