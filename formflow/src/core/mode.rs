//! Behavior switches for rule evaluation and full-form validation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparator used by the `max_length` rule.
///
/// Two variants of the rule have been in circulation. `Exceeds` rejects
/// values longer than the threshold. `LegacyShorterThan` keeps the inverted
/// comparison some consumers were built against: it rejects values *shorter*
/// than the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxLengthMode {
    /// Fail when the length is strictly greater than the threshold.
    Exceeds,
    /// Fail when the length is strictly less than the threshold.
    LegacyShorterThan,
}

impl Default for MaxLengthMode {
    fn default() -> Self {
        Self::Exceeds
    }
}

impl MaxLengthMode {
    /// Returns true if a value of `len` characters violates `threshold`.
    #[must_use]
    pub fn violates(self, len: usize, threshold: usize) -> bool {
        match self {
            Self::Exceeds => len > threshold,
            Self::LegacyShorterThan => len < threshold,
        }
    }
}

impl fmt::Display for MaxLengthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exceeds => write!(f, "exceeds"),
            Self::LegacyShorterThan => write!(f, "legacy_shorter_than"),
        }
    }
}

/// How far rule-based full-form validation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStrategy {
    /// Stop at the first failing field (it is the one that gets focus).
    StopAtFirstError,
    /// Validate every registered field; still focus only the first failure.
    AllFields,
}

impl Default for ValidationStrategy {
    fn default() -> Self {
        Self::StopAtFirstError
    }
}

impl fmt::Display for ValidationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopAtFirstError => write!(f, "stop_at_first_error"),
            Self::AllFields => write!(f, "all_fields"),
        }
    }
}
