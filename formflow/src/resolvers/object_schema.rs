//! Declarative object schema and its resolver.
//!
//! `ObjectSchema::validate` follows the throwing convention: it returns the
//! cast values or an aggregate [`SchemaValidationError`] holding every
//! violation. [`ObjectSchemaResolver`] catches that error and converts it.

use regex::Regex;
use serde_json::{Number, Value};
use std::fmt;

use super::{FieldErrors, Resolver, ResolverOutcome};
use crate::core::{to_display_string, FormValues};
use crate::errors::{FormError, InvalidPatternError, SchemaIssue, SchemaValidationError};

/// Expected type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Text; numbers and booleans are cast to their string form.
    String,
    /// Number; numeric strings are cast.
    Number,
    /// Boolean; `"true"`/`"false"` are cast.
    Boolean,
    /// Anything, passed through unchanged.
    Any,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Any => write!(f, "any"),
        }
    }
}

#[derive(Debug, Clone)]
enum Check {
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Pattern(Regex),
}

#[derive(Debug, Clone)]
struct CheckEntry {
    check: Check,
    message: Option<String>,
}

/// Schema for one field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    ty: FieldType,
    label: Option<String>,
    required: bool,
    required_message: Option<String>,
    checks: Vec<CheckEntry>,
}

impl FieldSchema {
    fn of(ty: FieldType) -> Self {
        Self {
            ty,
            label: None,
            required: false,
            required_message: None,
            checks: Vec::new(),
        }
    }

    /// A string field.
    #[must_use]
    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    /// A number field.
    #[must_use]
    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    /// A boolean field.
    #[must_use]
    pub fn boolean() -> Self {
        Self::of(FieldType::Boolean)
    }

    /// A field of any type.
    #[must_use]
    pub fn any() -> Self {
        Self::of(FieldType::Any)
    }

    /// Name used in default messages instead of the field key.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Rejects missing, `null` and (for strings) empty values.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Like [`FieldSchema::required`] with a custom message.
    #[must_use]
    pub fn required_with(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.required_message = Some(message.into());
        self
    }

    /// Minimum string length in characters.
    #[must_use]
    pub fn min_length(self, len: usize) -> Self {
        self.push(Check::MinLength(len))
    }

    /// Maximum string length in characters.
    #[must_use]
    pub fn max_length(self, len: usize) -> Self {
        self.push(Check::MaxLength(len))
    }

    /// Minimum number (inclusive).
    #[must_use]
    pub fn min(self, value: f64) -> Self {
        self.push(Check::Min(value))
    }

    /// Maximum number (inclusive).
    #[must_use]
    pub fn max(self, value: f64) -> Self {
        self.push(Check::Max(value))
    }

    /// String pattern (unanchored search).
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidPattern` if the expression does not compile.
    pub fn pattern(self, source: &str) -> Result<Self, FormError> {
        let regex = Regex::new(source)
            .map_err(|e| InvalidPatternError::new(source, e.to_string()))?;
        Ok(self.push(Check::Pattern(regex)))
    }

    /// Replaces the default message of the most recently added check.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            last.message = Some(message.into());
        }
        self
    }

    /// The field type.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    /// Whether the field is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    fn push(mut self, check: Check) -> Self {
        self.checks.push(CheckEntry {
            check,
            message: None,
        });
        self
    }

    fn cast(&self, value: &Value) -> Option<Value> {
        match (self.ty, value) {
            (FieldType::Any, v) => Some(v.clone()),
            (FieldType::String, Value::String(_)) => Some(value.clone()),
            (FieldType::String, Value::Number(_) | Value::Bool(_)) => {
                Some(Value::String(to_display_string(value)))
            }
            (FieldType::Number, Value::Number(_)) => Some(value.clone()),
            (FieldType::Number, Value::String(s)) => parse_number(s),
            (FieldType::Boolean, Value::Bool(_)) => Some(value.clone()),
            (FieldType::Boolean, Value::String(s)) => match s.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        }
    }

    fn check(
        &self,
        field: &str,
        value: Option<&Value>,
        issues: &mut Vec<SchemaIssue>,
    ) -> Option<Value> {
        let label = self.label.as_deref().unwrap_or(field);

        let missing = match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => self.ty == FieldType::String && s.is_empty(),
            Some(_) => false,
        };
        if missing {
            if self.required {
                let message = self
                    .required_message
                    .clone()
                    .unwrap_or_else(|| format!("{label} is a required field"));
                issues.push(SchemaIssue::field(field, message));
                return None;
            }
            return value.cloned();
        }

        let raw = value?;
        let Some(cast) = self.cast(raw) else {
            issues.push(SchemaIssue::field(
                field,
                format!("{label} must be a `{}` type", self.ty),
            ));
            return None;
        };

        for entry in &self.checks {
            if let Some(default) = violation(&entry.check, &cast, label) {
                let message = entry.message.clone().unwrap_or(default);
                issues.push(SchemaIssue::field(field, message));
            }
        }
        Some(cast)
    }
}

fn parse_number(s: &str) -> Option<Value> {
    let parsed = s.trim().parse::<f64>().ok().filter(|n| n.is_finite())?;
    #[allow(clippy::cast_possible_truncation)]
    let number = if parsed.fract() == 0.0 && parsed.abs() < 9.0e15 {
        Number::from(parsed as i64)
    } else {
        Number::from_f64(parsed)?
    };
    Some(Value::Number(number))
}

fn violation(check: &Check, value: &Value, label: &str) -> Option<String> {
    match check {
        Check::MinLength(min) => {
            let len = value.as_str()?.chars().count();
            (len < *min).then(|| format!("{label} must be at least {min} characters"))
        }
        Check::MaxLength(max) => {
            let len = value.as_str()?.chars().count();
            (len > *max).then(|| format!("{label} must be at most {max} characters"))
        }
        Check::Min(min) => {
            let n = value.as_f64()?;
            (n < *min).then(|| format!("{label} must be greater than or equal to {min}"))
        }
        Check::Max(max) => {
            let n = value.as_f64()?;
            (n > *max).then(|| format!("{label} must be less than or equal to {max}"))
        }
        Check::Pattern(regex) => {
            let s = value.as_str()?;
            (!regex.is_match(s))
                .then(|| format!("{label} must match the following: \"{}\"", regex.as_str()))
        }
    }
}

/// Schema for a whole value bag: an ordered list of field schemas.
///
/// # Example
///
/// ```rust,ignore
/// let schema = ObjectSchema::new()
///     .field("name", FieldSchema::string().required().min_length(3))
///     .field("age", FieldSchema::number().min(18.0).max(99.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, FieldSchema)>,
}

impl ObjectSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field; declaring the same name again replaces it.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = schema;
        } else {
            self.fields.push((name, schema));
        }
        self
    }

    /// Declared field names in order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Validates and casts the values, dropping undeclared keys.
    ///
    /// Every field is checked; all violations are collected.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaValidationError` with one issue per violation.
    pub fn validate(&self, values: &FormValues) -> Result<FormValues, SchemaValidationError> {
        let mut issues = Vec::new();
        let mut output = FormValues::new();

        for (name, schema) in &self.fields {
            if let Some(cast) = schema.check(name, values.get(name), &mut issues) {
                output.insert(name.clone(), cast);
            }
        }

        if issues.is_empty() {
            Ok(output)
        } else {
            Err(SchemaValidationError::new(issues))
        }
    }
}

/// Resolver over an [`ObjectSchema`].
#[derive(Debug, Clone)]
pub struct ObjectSchemaResolver {
    schema: ObjectSchema,
}

impl ObjectSchemaResolver {
    /// Wraps a schema.
    #[must_use]
    pub fn new(schema: ObjectSchema) -> Self {
        Self { schema }
    }

    /// The wrapped schema.
    #[must_use]
    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }
}

impl Resolver for ObjectSchemaResolver {
    fn resolve(&self, values: &FormValues) -> ResolverOutcome {
        match self.schema.validate(values) {
            Ok(values) => ResolverOutcome::Valid(values),
            Err(err) => ResolverOutcome::Invalid(FieldErrors::from_issues(err.inner)),
        }
    }

    fn name(&self) -> &str {
        "object_schema"
    }
}
