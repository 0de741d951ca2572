//! Whole-form schema validation adapters.
//!
//! A resolver validates the entire value bag at once and supersedes per-field
//! rules during full-form validation. Three schema technologies are
//! supported, each normalized to the same [`ResolverOutcome`]:
//!
//! - [`JsonSchemaResolver`]: JSON Schema documents, via the `jsonschema` crate
//! - [`ObjectSchemaResolver`]: the declarative [`ObjectSchema`] builder
//! - [`TypedResolver`]: a serde model implementing [`Validate`]
//!
//! Every variant validates exhaustively, drops keys the schema does not
//! declare from the successful values, and keys errors by the first path
//! segment keeping the first message per field.

mod json_schema;
mod object_schema;
mod typed;

pub use json_schema::JsonSchemaResolver;
pub use object_schema::{FieldSchema, FieldType, ObjectSchema, ObjectSchemaResolver};
pub use typed::{TypedResolver, Validate};

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::FormValues;
use crate::errors::SchemaIssue;

/// Error key for violations that are not attached to any field.
pub const ROOT_ERROR_KEY: &str = "root";

/// Field to message mapping where the first message for a field wins.
///
/// Iteration follows the order fields were first reported in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    entries: Vec<(String, String)>,
}

impl FieldErrors {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless the field already has one.
    ///
    /// Returns true if the message was kept.
    pub fn insert_first(&mut self, field: impl Into<String>, message: impl Into<String>) -> bool {
        let field = field.into();
        if self.contains_key(&field) {
            return false;
        }
        self.entries.push((field, message.into()));
        true
    }

    /// Builds the mapping from schema issues.
    ///
    /// Issues without a top-level field are keyed under [`ROOT_ERROR_KEY`].
    #[must_use]
    pub fn from_issues<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = SchemaIssue>,
    {
        let mut errors = Self::new();
        for issue in issues {
            let field = issue.top_level_field().unwrap_or(ROOT_ERROR_KEY).to_string();
            errors.insert_first(field, issue.message);
        }
        errors
    }

    /// Gets the message for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    /// Checks if a field has a message.
    #[must_use]
    pub fn contains_key(&self, field: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == field)
    }

    /// Iterates `(field, message)` in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the fields in report order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Returns the number of fields with a message.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts into a sorted map.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.entries.into_iter().collect()
    }
}

impl IntoIterator for FieldErrors {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Result of resolving a value bag: validated values or per-field errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolverOutcome {
    /// The bag passed; carries the (possibly coerced and stripped) values.
    Valid(FormValues),
    /// The bag failed; carries the errors.
    Invalid(FieldErrors),
}

impl ResolverOutcome {
    /// Returns true for `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The validated values, if valid.
    #[must_use]
    pub fn values(&self) -> Option<&FormValues> {
        match self {
            Self::Valid(values) => Some(values),
            Self::Invalid(_) => None,
        }
    }

    /// The errors, if invalid.
    #[must_use]
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    /// Converts into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the field errors for an invalid outcome.
    pub fn into_result(self) -> Result<FormValues, FieldErrors> {
        match self {
            Self::Valid(values) => Ok(values),
            Self::Invalid(errors) => Err(errors),
        }
    }

    /// Serializes to the `{"values": ...}` / `{"errors": ...}` shape.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Valid(values) => serde_json::json!({ "values": values }),
            Self::Invalid(errors) => {
                let map: serde_json::Map<String, serde_json::Value> = errors
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                    .collect();
                serde_json::json!({ "errors": map })
            }
        }
    }
}

/// Validates a whole value bag.
///
/// Closures of the right shape are resolvers too.
pub trait Resolver: Send + Sync {
    /// Validates the bag.
    fn resolve(&self, values: &FormValues) -> ResolverOutcome;

    /// Name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Resolver for F
where
    F: Fn(&FormValues) -> ResolverOutcome + Send + Sync,
{
    fn resolve(&self, values: &FormValues) -> ResolverOutcome {
        self(values)
    }
}

/// Keeps only the keys in `declared`, preserving the input order.
pub(crate) fn strip_undeclared<'a, I>(values: &FormValues, declared: I) -> FormValues
where
    I: IntoIterator<Item = &'a str>,
{
    let declared: Vec<&str> = declared.into_iter().collect();
    values
        .iter()
        .filter(|(key, _)| declared.contains(&key.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
