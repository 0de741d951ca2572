//! Shared test fixtures.
//!
//! The signup form used throughout the tests requires `name` (at least 3
//! characters) and accepts an optional `age` between 18 and 99. It is
//! available in every schema technology the crate supports.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::FormValues;
use crate::errors::{FormError, SchemaIssue, SchemaValidationError};
use crate::form::{Form, FormOptions};
use crate::resolvers::{
    FieldSchema, JsonSchemaResolver, ObjectSchema, ObjectSchemaResolver, TypedResolver, Validate,
};
use crate::rules::FieldRules;

/// Converts a JSON object into `FormValues`; anything else yields an empty
/// bag.
#[must_use]
pub fn form_values(value: Value) -> FormValues {
    match value {
        Value::Object(map) => map,
        _ => FormValues::new(),
    }
}

/// Valid signup values.
#[must_use]
pub fn valid_signup() -> FormValues {
    form_values(json!({"name": "Jack", "age": 25}))
}

/// Signup values failing both fields.
#[must_use]
pub fn invalid_signup() -> FormValues {
    form_values(json!({"name": "", "age": 15}))
}

/// Valid signup values with an undeclared key.
#[must_use]
pub fn signup_with_extra() -> FormValues {
    form_values(json!({"name": "Jack", "age": 25, "extra": "x"}))
}

/// The signup schema as a JSON Schema document.
#[must_use]
pub fn signup_json_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "minLength": 3 },
            "age": { "type": "number", "minimum": 18, "maximum": 99 }
        },
        "required": ["name"]
    })
}

/// Resolver over [`signup_json_schema`].
///
/// # Errors
///
/// Propagates schema compilation errors.
pub fn signup_json_schema_resolver() -> Result<JsonSchemaResolver, FormError> {
    JsonSchemaResolver::new(signup_json_schema())
}

/// The signup schema as an [`ObjectSchema`].
#[must_use]
pub fn signup_object_schema() -> ObjectSchema {
    ObjectSchema::new()
        .field("name", FieldSchema::string().required().min_length(3))
        .field("age", FieldSchema::number().min(18.0).max(99.0))
}

/// Resolver over [`signup_object_schema`].
#[must_use]
pub fn signup_object_resolver() -> ObjectSchemaResolver {
    ObjectSchemaResolver::new(signup_object_schema())
}

/// The signup schema as a serde model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignupModel {
    /// Display name.
    pub name: String,
    /// Age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

impl Validate for SignupModel {
    fn validate(&self) -> Result<(), SchemaValidationError> {
        let mut err = SchemaValidationError::default();
        if self.name.chars().count() < 3 {
            err.push(SchemaIssue::field("name", "Name must be at least 3 characters"));
        }
        if let Some(age) = self.age {
            if !(18..=99).contains(&age) {
                err.push(SchemaIssue::field("age", "Age must be between 18 and 99"));
            }
        }
        if err.is_empty() {
            Ok(())
        } else {
            Err(err)
        }
    }
}

/// Resolver over [`SignupModel`].
#[must_use]
pub fn signup_typed_resolver() -> TypedResolver<SignupModel> {
    TypedResolver::new()
}

/// Per-field rules equivalent to the signup schema.
#[must_use]
pub fn signup_rules() -> Vec<(&'static str, FieldRules)> {
    vec![
        (
            "name",
            FieldRules::new()
                .required()
                .min_length(3, "Name must be at least 3 characters"),
        ),
        (
            "age",
            FieldRules::new()
                .min(18.0, "Must be at least 18")
                .max(99.0, "Must be at most 99"),
        ),
    ]
}

/// A form with empty signup defaults, configured by `options`, with the
/// signup rules registered.
#[must_use]
pub fn signup_form(options: FormOptions) -> Form {
    let form = Form::new(options.with_defaults(form_values(json!({"name": "", "age": null}))));
    for (name, rules) in signup_rules() {
        let _binding = form.register(name, Some(rules));
    }
    form
}
