//! Declarative per-field rule sets.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::errors::{FormError, InvalidPatternError};

/// Predicate over the string form of a value.
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// The individual checks a rule set can carry, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Value must be present and not blank.
    Required,
    /// Minimum string length.
    MinLength,
    /// Maximum string length.
    MaxLength,
    /// Minimum numeric value.
    Min,
    /// Maximum numeric value.
    Max,
    /// Regular expression match.
    Pattern,
    /// Caller-supplied predicate.
    Validate,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::MinLength => write!(f, "min_length"),
            Self::MaxLength => write!(f, "max_length"),
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
            Self::Pattern => write!(f, "pattern"),
            Self::Validate => write!(f, "validate"),
        }
    }
}

/// A length threshold with its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthRule {
    /// Threshold in characters.
    pub value: usize,
    /// Message written on failure.
    pub message: String,
}

/// A numeric threshold with its message.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundRule {
    /// Threshold.
    pub value: f64,
    /// Message written on failure.
    pub message: String,
}

/// A compiled pattern with its message.
#[derive(Debug, Clone)]
pub struct PatternRule {
    /// Compiled expression (unanchored search).
    pub regex: Regex,
    /// Message written on failure.
    pub message: String,
}

/// A custom predicate with an optional message.
#[derive(Clone)]
pub struct CustomRule {
    /// Returns true when the value is acceptable.
    pub predicate: Predicate,
    /// Message written on failure; a configured default is used when absent.
    pub message: Option<String>,
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Rules attached to one field.
///
/// # Example
///
/// ```rust,ignore
/// let rules = FieldRules::new()
///     .required_with("Email is required")
///     .pattern(r"^\S+@\S+\.\S+$", "Invalid email")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    /// `Some` when the field is required; the inner value is a custom message.
    pub required: Option<Option<String>>,
    /// Minimum length.
    pub min_length: Option<LengthRule>,
    /// Maximum length.
    pub max_length: Option<LengthRule>,
    /// Minimum number.
    pub min: Option<BoundRule>,
    /// Maximum number.
    pub max: Option<BoundRule>,
    /// Pattern.
    pub pattern: Option<PatternRule>,
    /// Custom predicate.
    pub validate: Option<CustomRule>,
}

impl FieldRules {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the field required with the default message.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = Some(None);
        self
    }

    /// Marks the field required with a custom message.
    #[must_use]
    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.required = Some(Some(message.into()));
        self
    }

    /// Sets the minimum length.
    #[must_use]
    pub fn min_length(mut self, value: usize, message: impl Into<String>) -> Self {
        self.min_length = Some(LengthRule {
            value,
            message: message.into(),
        });
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn max_length(mut self, value: usize, message: impl Into<String>) -> Self {
        self.max_length = Some(LengthRule {
            value,
            message: message.into(),
        });
        self
    }

    /// Sets the minimum number.
    #[must_use]
    pub fn min(mut self, value: f64, message: impl Into<String>) -> Self {
        self.min = Some(BoundRule {
            value,
            message: message.into(),
        });
        self
    }

    /// Sets the maximum number.
    #[must_use]
    pub fn max(mut self, value: f64, message: impl Into<String>) -> Self {
        self.max = Some(BoundRule {
            value,
            message: message.into(),
        });
        self
    }

    /// Compiles and sets the pattern.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidPattern` if the expression does not compile.
    pub fn pattern(self, source: &str, message: impl Into<String>) -> Result<Self, FormError> {
        let regex = Regex::new(source)
            .map_err(|e| InvalidPatternError::new(source, e.to_string()))?;
        Ok(self.pattern_regex(regex, message))
    }

    /// Sets an already compiled pattern.
    #[must_use]
    pub fn pattern_regex(mut self, regex: Regex, message: impl Into<String>) -> Self {
        self.pattern = Some(PatternRule {
            regex,
            message: message.into(),
        });
        self
    }

    /// Sets the custom predicate.
    #[must_use]
    pub fn validate<F>(mut self, predicate: F, message: Option<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(CustomRule {
            predicate: Arc::new(predicate),
            message,
        });
        self
    }

    /// Returns true if no rule is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.min.is_none()
            && self.max.is_none()
            && self.pattern.is_none()
            && self.validate.is_none()
    }

    /// Lists the rules that are set, in evaluation order.
    #[must_use]
    pub fn kinds(&self) -> Vec<RuleKind> {
        let mut kinds = Vec::new();
        if self.required.is_some() {
            kinds.push(RuleKind::Required);
        }
        if self.min_length.is_some() {
            kinds.push(RuleKind::MinLength);
        }
        if self.max_length.is_some() {
            kinds.push(RuleKind::MaxLength);
        }
        if self.min.is_some() {
            kinds.push(RuleKind::Min);
        }
        if self.max.is_some() {
            kinds.push(RuleKind::Max);
        }
        if self.pattern.is_some() {
            kinds.push(RuleKind::Pattern);
        }
        if self.validate.is_some() {
            kinds.push(RuleKind::Validate);
        }
        kinds
    }
}

/// `required` accepts either a flag or a custom message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequiredSpec {
    /// `true` enables the rule with the default message.
    Flag(bool),
    /// Enables the rule with this message.
    Message(String),
}

/// A threshold plus message as it appears in serialized rule sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSpec<T> {
    /// Threshold or pattern source.
    pub value: T,
    /// Message written on failure.
    pub message: String,
}

/// Serializable form of [`FieldRules`], minus the custom predicate.
///
/// Field names follow the camelCase used by front-end rule objects, e.g.
/// `{"required": "Name is required", "minLength": {"value": 3, "message": "..."}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleSpec {
    /// Required flag or message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<RequiredSpec>,
    /// Minimum length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<ThresholdSpec<usize>>,
    /// Maximum length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<ThresholdSpec<usize>>,
    /// Minimum number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<ThresholdSpec<f64>>,
    /// Maximum number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<ThresholdSpec<f64>>,
    /// Pattern source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<ThresholdSpec<String>>,
}

impl TryFrom<RuleSpec> for FieldRules {
    type Error = FormError;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        let mut rules = Self::new();
        match spec.required {
            Some(RequiredSpec::Flag(true)) => rules = rules.required(),
            Some(RequiredSpec::Message(message)) => rules = rules.required_with(message),
            Some(RequiredSpec::Flag(false)) | None => {}
        }
        if let Some(t) = spec.min_length {
            rules = rules.min_length(t.value, t.message);
        }
        if let Some(t) = spec.max_length {
            rules = rules.max_length(t.value, t.message);
        }
        if let Some(t) = spec.min {
            rules = rules.min(t.value, t.message);
        }
        if let Some(t) = spec.max {
            rules = rules.max(t.value, t.message);
        }
        if let Some(t) = spec.pattern {
            rules = rules.pattern(&t.value, t.message)?;
        }
        Ok(rules)
    }
}

impl FieldRules {
    /// Parses a rule set from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a rule set or a pattern
    /// does not compile.
    pub fn from_json(value: serde_json::Value) -> Result<Self, FormError> {
        let spec: RuleSpec = serde_json::from_value(value)?;
        Self::try_from(spec)
    }
}
