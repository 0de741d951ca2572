//! Error types for the formflow crate.
//!
//! Field validation failures are not errors: they are reported through the
//! error bag and the boolean result of `validate_all`. The types here cover
//! configuration and programming mistakes (bad patterns, bad schemas,
//! unknown fields) and the failure of throwing-style schema technologies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for formflow operations.
#[derive(Debug, Error)]
pub enum FormError {
    /// A `pattern` rule or schema constraint did not compile.
    #[error("{0}")]
    InvalidPattern(#[from] InvalidPatternError),

    /// A JSON Schema document could not be compiled.
    #[error("Invalid JSON schema: {0}")]
    InvalidSchema(String),

    /// Default values were not a JSON object.
    #[error("Default values must be an object, got {0}")]
    InvalidDefaults(String),

    /// A write targeted a field the form does not know about.
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error raised when a regular expression fails to compile.
#[derive(Debug, Clone, Error)]
#[error("Invalid pattern '{pattern}': {reason}")]
pub struct InvalidPatternError {
    /// The offending pattern source.
    pub pattern: String,
    /// Compiler diagnostic.
    pub reason: String,
}

impl InvalidPatternError {
    /// Creates a new invalid pattern error.
    #[must_use]
    pub fn new(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

/// A single violation reported by a schema technology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
    /// Path segments from the root of the value bag to the violating value.
    pub path: Vec<String>,
    /// Human-readable message.
    pub message: String,
}

impl SchemaIssue {
    /// Creates an issue at the given path.
    #[must_use]
    pub fn new<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// Creates an issue for a top-level field.
    #[must_use]
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: vec![name.into()],
            message: message.into(),
        }
    }

    /// Returns the top-level field this issue belongs to.
    #[must_use]
    pub fn top_level_field(&self) -> Option<&str> {
        self.path
            .first()
            .map(String::as_str)
            .filter(|segment| !segment.is_empty())
    }
}

/// Aggregate failure raised by throwing-style schema validation.
///
/// Carries every violation found in one pass, in the order they were found.
#[derive(Debug, Clone, Default, Error)]
#[error("{} validation error(s)", .inner.len())]
pub struct SchemaValidationError {
    /// Individual violations.
    pub inner: Vec<SchemaIssue>,
}

impl SchemaValidationError {
    /// Creates an aggregate error from the collected issues.
    #[must_use]
    pub fn new(inner: Vec<SchemaIssue>) -> Self {
        Self { inner }
    }

    /// Adds one violation.
    pub fn push(&mut self, issue: SchemaIssue) {
        self.inner.push(issue);
    }

    /// Returns true if no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_display() {
        let err = InvalidPatternError::new("[a-", "unclosed character class");
        assert_eq!(
            err.to_string(),
            "Invalid pattern '[a-': unclosed character class"
        );
    }

    #[test]
    fn test_form_error_from_pattern() {
        let err: FormError = InvalidPatternError::new("(", "unclosed group").into();
        assert!(matches!(err, FormError::InvalidPattern(_)));
    }

    #[test]
    fn test_unknown_field_display() {
        let err = FormError::UnknownField("nickname".to_string());
        assert_eq!(err.to_string(), "Unknown field 'nickname'");
    }

    #[test]
    fn test_schema_issue_top_level_field() {
        let issue = SchemaIssue::new(["address", "street"], "too short");
        assert_eq!(issue.top_level_field(), Some("address"));

        let root = SchemaIssue::new(Vec::<String>::new(), "bad input");
        assert_eq!(root.top_level_field(), None);

        let blank = SchemaIssue::new([""], "bad input");
        assert_eq!(blank.top_level_field(), None);
    }

    #[test]
    fn test_schema_validation_error_display() {
        let mut err = SchemaValidationError::default();
        assert!(err.is_empty());
        err.push(SchemaIssue::field("name", "required"));
        err.push(SchemaIssue::field("age", "too small"));
        assert_eq!(err.to_string(), "2 validation error(s)");
        assert_eq!(err.inner.len(), 2);
    }
}
