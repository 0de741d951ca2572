//! JSON Schema resolver.

use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use std::fmt;
use tracing::debug;

use super::{strip_undeclared, FieldErrors, Resolver, ResolverOutcome};
use crate::core::FormValues;
use crate::errors::{FormError, SchemaIssue};

/// Validates the value bag against a JSON Schema document.
///
/// Top-level `properties` of the schema define which keys survive in the
/// validated values. A schema without `properties` passes every key through.
///
/// # Example
///
/// ```rust,ignore
/// let resolver = JsonSchemaResolver::new(json!({
///     "type": "object",
///     "properties": {
///         "name": { "type": "string", "minLength": 3 },
///         "age": { "type": "number", "minimum": 18, "maximum": 99 }
///     },
///     "required": ["name"]
/// }))?;
/// ```
pub struct JsonSchemaResolver {
    validator: Validator,
    declared: Option<Vec<String>>,
}

impl fmt::Debug for JsonSchemaResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaResolver")
            .field("declared", &self.declared)
            .finish_non_exhaustive()
    }
}

impl JsonSchemaResolver {
    /// Compiles the schema.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidSchema` if the document is not a valid
    /// schema.
    pub fn new(schema: Value) -> Result<Self, FormError> {
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| FormError::InvalidSchema(e.to_string()))?;
        let declared = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect());

        Ok(Self {
            validator,
            declared,
        })
    }

    /// Keys the schema declares, if it declares any.
    #[must_use]
    pub fn declared_fields(&self) -> Option<&[String]> {
        self.declared.as_deref()
    }
}

impl Resolver for JsonSchemaResolver {
    fn resolve(&self, values: &FormValues) -> ResolverOutcome {
        let instance = Value::Object(values.clone());
        let issues: Vec<SchemaIssue> = self
            .validator
            .iter_errors(&instance)
            .map(|error| issue_from(&error))
            .collect();

        if !issues.is_empty() {
            debug!(issue_count = issues.len(), "JSON schema rejected values");
            return ResolverOutcome::Invalid(FieldErrors::from_issues(issues));
        }

        let values = match &self.declared {
            Some(declared) => strip_undeclared(values, declared.iter().map(String::as_str)),
            None => values.clone(),
        };
        ResolverOutcome::Valid(values)
    }

    fn name(&self) -> &str {
        "json_schema"
    }
}

fn issue_from(error: &ValidationError<'_>) -> SchemaIssue {
    let pointer = error.instance_path.to_string();
    let mut path: Vec<String> = pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect();

    // a missing property is reported against its parent object
    if path.is_empty() {
        if let ValidationErrorKind::Required { property } = &error.kind {
            path.push(
                property
                    .as_str()
                    .map_or_else(|| property.to_string(), str::to_string),
            );
        }
    }

    SchemaIssue::new(path, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn values(v: Value) -> FormValues {
        match v {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn signup() -> JsonSchemaResolver {
        JsonSchemaResolver::new(json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "minLength": 3 },
                "age": { "type": "number", "minimum": 18, "maximum": 99 }
            },
            "required": ["name"]
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_values() {
        let outcome = signup().resolve(&values(json!({"name": "Jack", "age": 25})));
        assert_eq!(
            outcome,
            ResolverOutcome::Valid(values(json!({"name": "Jack", "age": 25})))
        );
    }

    #[test]
    fn test_collects_every_field() {
        let outcome = signup().resolve(&values(json!({"name": "", "age": 15})));
        let errors = outcome.errors().unwrap();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("age"));
    }

    #[test]
    fn test_strips_unknown_keys() {
        let outcome = signup().resolve(&values(json!({"name": "Jack", "age": 25, "extra": "x"})));
        let validated = outcome.values().unwrap();
        assert!(validated.get("extra").is_none());
        assert_eq!(validated.len(), 2);
    }

    #[test]
    fn test_required_keyed_by_property() {
        let outcome = signup().resolve(&values(json!({"age": 30})));
        let errors = outcome.errors().unwrap();
        assert_eq!(errors.keys(), vec!["name"]);
    }

    #[test]
    fn test_first_message_per_field_wins() {
        let resolver = JsonSchemaResolver::new(json!({
            "type": "object",
            "properties": {
                "code": { "type": "string", "minLength": 4, "pattern": "^[0-9]+$" }
            }
        }))
        .unwrap();
        let outcome = resolver.resolve(&values(json!({"code": "ab"})));
        let errors = outcome.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("code").is_some());
    }

    #[test]
    fn test_invalid_schema() {
        let err = JsonSchemaResolver::new(json!({"type": 12})).unwrap_err();
        assert!(matches!(err, FormError::InvalidSchema(_)));
    }

    #[test]
    fn test_schema_without_properties_keeps_keys() {
        let resolver = JsonSchemaResolver::new(json!({"type": "object"})).unwrap();
        assert!(resolver.declared_fields().is_none());
        let outcome = resolver.resolve(&values(json!({"anything": 1})));
        assert_eq!(outcome.values().unwrap().len(), 1);
    }
}
