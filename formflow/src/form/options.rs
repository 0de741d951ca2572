//! Form configuration and construction options.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::focus::{FieldFocus, NoOpFieldFocus};
use crate::core::{FormValues, MaxLengthMode, ValidationStrategy};
use crate::errors::FormError;
use crate::events::{EventSink, NoOpEventSink};
use crate::resolvers::Resolver;
use crate::rules::{
    FieldValidator, RuleValidator, DEFAULT_INVALID_MESSAGE, DEFAULT_REQUIRED_MESSAGE,
};

/// Behavior settings of a form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormConfig {
    /// Name used in logs and event payloads.
    #[serde(default = "default_name")]
    pub name: String,

    /// Message for a failing `required` rule without a custom message.
    #[serde(default = "default_required_message")]
    pub required_message: String,

    /// Message for a failing custom predicate without a custom message.
    #[serde(default = "default_invalid_message")]
    pub invalid_message: String,

    /// Comparator used by `max_length` rules.
    #[serde(default)]
    pub max_length_mode: MaxLengthMode,

    /// Whether full validation stops at the first failing field.
    #[serde(default)]
    pub validation_strategy: ValidationStrategy,

    /// Whether the first failing field is focused after full validation.
    #[serde(default = "default_true")]
    pub focus_on_error: bool,

    /// Whether `on_input` validates fields with rules.
    #[serde(default = "default_true")]
    pub validate_on_input: bool,

    /// Whether `on_blur` validates fields with rules.
    #[serde(default = "default_true")]
    pub validate_on_blur: bool,
}

fn default_name() -> String {
    "form".to_string()
}

fn default_required_message() -> String {
    DEFAULT_REQUIRED_MESSAGE.to_string()
}

fn default_invalid_message() -> String {
    DEFAULT_INVALID_MESSAGE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            required_message: default_required_message(),
            invalid_message: default_invalid_message(),
            max_length_mode: MaxLengthMode::default(),
            validation_strategy: ValidationStrategy::default(),
            focus_on_error: true,
            validate_on_input: true,
            validate_on_blur: true,
        }
    }
}

impl FormConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Serialization` for malformed JSON or unknown
    /// enum values.
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the form name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the default required message.
    #[must_use]
    pub fn with_required_message(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }

    /// Sets the default invalid message.
    #[must_use]
    pub fn with_invalid_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_message = message.into();
        self
    }

    /// Sets the `max_length` comparator.
    #[must_use]
    pub fn with_max_length_mode(mut self, mode: MaxLengthMode) -> Self {
        self.max_length_mode = mode;
        self
    }

    /// Sets the full validation strategy.
    #[must_use]
    pub fn with_validation_strategy(mut self, strategy: ValidationStrategy) -> Self {
        self.validation_strategy = strategy;
        self
    }

    /// Enables or disables focusing the first failing field.
    #[must_use]
    pub fn with_focus_on_error(mut self, enabled: bool) -> Self {
        self.focus_on_error = enabled;
        self
    }

    /// Enables or disables validation on input.
    #[must_use]
    pub fn with_validate_on_input(mut self, enabled: bool) -> Self {
        self.validate_on_input = enabled;
        self
    }

    /// Enables or disables validation on blur.
    #[must_use]
    pub fn with_validate_on_blur(mut self, enabled: bool) -> Self {
        self.validate_on_blur = enabled;
        self
    }

    /// Builds the rule validator these settings describe.
    #[must_use]
    pub fn rule_validator(&self) -> RuleValidator {
        RuleValidator::new()
            .with_max_length_mode(self.max_length_mode)
            .with_required_message(self.required_message.clone())
            .with_invalid_message(self.invalid_message.clone())
    }
}

/// Everything a form is built from.
///
/// # Example
///
/// ```rust,ignore
/// let form = Form::new(
///     FormOptions::new()
///         .with_defaults_json(json!({"name": "", "age": null}))?
///         .with_resolver(JsonSchemaResolver::new(schema)?),
/// );
/// ```
#[derive(Clone, Default)]
pub struct FormOptions {
    /// Initial values; they also define the known field names.
    pub defaults: FormValues,
    /// Whole-form resolver superseding per-field rules on full validation.
    pub resolver: Option<Arc<dyn Resolver>>,
    /// Focus capability used after a failed full validation.
    pub focus: Option<Arc<dyn FieldFocus>>,
    /// Receiver of lifecycle events.
    pub sink: Option<Arc<dyn EventSink>>,
    /// Field validator override; built from `config` when absent.
    pub validator: Option<Arc<dyn FieldValidator>>,
    /// Behavior settings.
    pub config: FormConfig,
}

impl fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("defaults", &self.defaults)
            .field("resolver", &self.resolver.as_ref().map(|r| r.name().to_string()))
            .field("has_focus", &self.focus.is_some())
            .field("has_sink", &self.sink.is_some())
            .field("has_validator", &self.validator.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl FormOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial values.
    #[must_use]
    pub fn with_defaults(mut self, defaults: FormValues) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the initial values from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidDefaults` if `defaults` is not an object.
    pub fn with_defaults_json(mut self, defaults: Value) -> Result<Self, FormError> {
        match defaults {
            Value::Object(map) => {
                self.defaults = map;
                Ok(self)
            }
            other => Err(FormError::InvalidDefaults(json_kind(&other).to_string())),
        }
    }

    /// Sets the resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Sets a shared resolver.
    #[must_use]
    pub fn with_shared_resolver(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Sets the focus capability.
    #[must_use]
    pub fn with_focus(mut self, focus: Arc<dyn FieldFocus>) -> Self {
        self.focus = Some(focus);
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replaces the field validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn FieldValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the behavior settings.
    #[must_use]
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn resolve_focus(&self) -> Arc<dyn FieldFocus> {
        self.focus.clone().unwrap_or_else(|| Arc::new(NoOpFieldFocus))
    }

    pub(crate) fn resolve_sink(&self) -> Arc<dyn EventSink> {
        self.sink.clone().unwrap_or_else(|| Arc::new(NoOpEventSink))
    }

    pub(crate) fn resolve_validator(&self) -> Arc<dyn FieldValidator> {
        self.validator
            .clone()
            .unwrap_or_else(|| Arc::new(self.config.rule_validator()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_defaults() {
        let config = FormConfig::default();
        assert_eq!(config.name, "form");
        assert_eq!(config.required_message, "This field is required");
        assert_eq!(config.invalid_message, "Invalid value");
        assert_eq!(config.max_length_mode, MaxLengthMode::Exceeds);
        assert_eq!(config.validation_strategy, ValidationStrategy::StopAtFirstError);
        assert!(config.focus_on_error);
        assert!(config.validate_on_input);
        assert!(config.validate_on_blur);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = FormConfig::from_json(
            r#"{
                "name": "signup",
                "max_length_mode": "legacy_shorter_than",
                "validate_on_blur": false
            }"#,
        )
        .unwrap();
        assert_eq!(config.name, "signup");
        assert_eq!(config.max_length_mode, MaxLengthMode::LegacyShorterThan);
        assert!(!config.validate_on_blur);
        assert!(config.validate_on_input);
        assert_eq!(config.required_message, "This field is required");
    }

    #[test]
    fn test_config_from_bad_json() {
        let err = FormConfig::from_json(r#"{"validation_strategy": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, FormError::Serialization(_)));
    }

    #[test]
    fn test_config_builders() {
        let config = FormConfig::new()
            .with_name("login")
            .with_required_message("Required")
            .with_validation_strategy(ValidationStrategy::AllFields)
            .with_focus_on_error(false);
        assert_eq!(config.name, "login");
        assert_eq!(config.required_message, "Required");
        assert_eq!(config.validation_strategy, ValidationStrategy::AllFields);
        assert!(!config.focus_on_error);
    }

    #[test]
    fn test_defaults_json_must_be_object() {
        let err = FormOptions::new().with_defaults_json(json!([1, 2])).unwrap_err();
        assert_eq!(err.to_string(), "Default values must be an object, got array");

        let options = FormOptions::new()
            .with_defaults_json(json!({"name": "Jack"}))
            .unwrap();
        assert_eq!(options.defaults.get("name"), Some(&json!("Jack")));
    }
}
