//! Rule evaluation for a single field.

use serde_json::Value;
use tracing::debug;

use super::rule_set::{FieldRules, RuleKind};
use crate::core::{
    display_len, is_present, is_truthy, to_display_string, to_finite_number, MaxLengthMode,
};
use crate::store::ErrorBag;

/// Message used by `required` when the rule carries none.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required";

/// Message used by the custom predicate when the rule carries none.
pub const DEFAULT_INVALID_MESSAGE: &str = "Invalid value";

/// A rule that fired, with the message to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    /// Which rule fired.
    pub kind: RuleKind,
    /// Message for the error bag.
    pub message: String,
}

/// Validates one field value against its rules and records the outcome.
///
/// Implementations write the failure message into `errors` at `name` and
/// clear a stale message on success.
pub trait FieldValidator: Send + Sync {
    /// Returns true if the value passes every rule.
    fn validate_field(
        &self,
        name: &str,
        value: Option<&Value>,
        rules: &FieldRules,
        errors: &ErrorBag,
    ) -> bool;
}

/// The built-in rule validator.
///
/// Rules run in a fixed order (`required`, `min_length`, `max_length`,
/// `min`, `max`, `pattern`, `validate`) and the first failure wins.
#[derive(Debug, Clone)]
pub struct RuleValidator {
    max_length_mode: MaxLengthMode,
    required_message: String,
    invalid_message: String,
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self {
            max_length_mode: MaxLengthMode::default(),
            required_message: DEFAULT_REQUIRED_MESSAGE.to_string(),
            invalid_message: DEFAULT_INVALID_MESSAGE.to_string(),
        }
    }
}

impl RuleValidator {
    /// Creates a validator with default messages and comparator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `max_length` comparator.
    #[must_use]
    pub fn with_max_length_mode(mut self, mode: MaxLengthMode) -> Self {
        self.max_length_mode = mode;
        self
    }

    /// Sets the fallback message for `required`.
    #[must_use]
    pub fn with_required_message(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }

    /// Sets the fallback message for the custom predicate.
    #[must_use]
    pub fn with_invalid_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_message = message.into();
        self
    }

    /// The configured `max_length` comparator.
    #[must_use]
    pub fn max_length_mode(&self) -> MaxLengthMode {
        self.max_length_mode
    }

    /// Evaluates the rules without touching any error bag.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn check(&self, value: Option<&Value>, rules: &FieldRules) -> Result<(), RuleViolation> {
        if let Some(custom) = &rules.required {
            let blank = value.map_or(true, |v| to_display_string(v).trim().is_empty());
            if !is_present(value) || blank {
                let message = custom.clone().unwrap_or_else(|| self.required_message.clone());
                return Err(RuleViolation {
                    kind: RuleKind::Required,
                    message,
                });
            }
        }

        // every remaining rule only applies to present values
        let Some(value) = value.filter(|v| is_truthy(v)) else {
            return Ok(());
        };

        if let Some(rule) = &rules.min_length {
            if display_len(value) < rule.value {
                return Err(violation(RuleKind::MinLength, &rule.message));
            }
        }

        if let Some(rule) = &rules.max_length {
            if self.max_length_mode.violates(display_len(value), rule.value) {
                return Err(violation(RuleKind::MaxLength, &rule.message));
            }
        }

        let number = to_finite_number(value);

        if let (Some(rule), Some(n)) = (&rules.min, number) {
            if n < rule.value {
                return Err(violation(RuleKind::Min, &rule.message));
            }
        }

        if let (Some(rule), Some(n)) = (&rules.max, number) {
            if n > rule.value {
                return Err(violation(RuleKind::Max, &rule.message));
            }
        }

        if let Some(rule) = &rules.pattern {
            if !rule.regex.is_match(&to_display_string(value)) {
                return Err(violation(RuleKind::Pattern, &rule.message));
            }
        }

        if let Some(rule) = &rules.validate {
            if !(rule.predicate)(&to_display_string(value)) {
                let message = rule
                    .message
                    .clone()
                    .unwrap_or_else(|| self.invalid_message.clone());
                return Err(RuleViolation {
                    kind: RuleKind::Validate,
                    message,
                });
            }
        }

        Ok(())
    }
}

fn violation(kind: RuleKind, message: &str) -> RuleViolation {
    RuleViolation {
        kind,
        message: message.to_string(),
    }
}

impl FieldValidator for RuleValidator {
    fn validate_field(
        &self,
        name: &str,
        value: Option<&Value>,
        rules: &FieldRules,
        errors: &ErrorBag,
    ) -> bool {
        if rules.is_empty() {
            return true;
        }
        match self.check(value, rules) {
            Ok(()) => {
                errors.clear(name);
                true
            }
            Err(violation) => {
                debug!(
                    field = name,
                    rule = %violation.kind,
                    message = %violation.message,
                    "Field failed validation"
                );
                errors.set(name, violation.message);
                false
            }
        }
    }
}
