//! Resolver backed by a serde model.
//!
//! The value bag is deserialized into `T`, which then checks itself through
//! [`Validate`]. Keys `T` does not declare are ignored by deserialization and
//! therefore absent from the validated values.
//!
//! Deserialization failures are attributed to the top-level key whose value
//! failed. That key is swapped for the matching field of `T::default()` and
//! deserialization is retried, so every badly typed field is reported and
//! `T::validate` still runs over the rest of the model.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

use super::{FieldErrors, Resolver, ResolverOutcome};
use crate::core::FormValues;
use crate::errors::{SchemaIssue, SchemaValidationError};

/// Field-level checks on a deserialized model.
pub trait Validate {
    /// Checks the model, reporting every violation.
    ///
    /// # Errors
    ///
    /// Returns the collected issues if any check fails.
    fn validate(&self) -> Result<(), SchemaValidationError>;
}

/// Resolver that deserializes the bag into `T` and validates it.
///
/// `T::default()` supplies stand-in values for fields that fail to
/// deserialize.
pub struct TypedResolver<T> {
    _model: PhantomData<fn() -> T>,
}

impl<T> TypedResolver<T> {
    /// Creates a resolver for `T`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _model: PhantomData,
        }
    }
}

impl<T> Default for TypedResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedResolver<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypedResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedResolver")
            .field("model", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> TypedResolver<T>
where
    T: DeserializeOwned + Serialize + Default + Validate,
{
    /// Deserializes and validates, returning the model itself.
    ///
    /// # Errors
    ///
    /// Returns every issue found by deserialization or by `T::validate`.
    pub fn parse(&self, values: &FormValues) -> Result<T, SchemaValidationError> {
        let (model, mut issues) = deserialize_collecting::<T>(values);
        if let Some(Err(err)) = model.as_ref().map(Validate::validate) {
            issues.extend(err.inner);
        }
        match model {
            Some(model) if issues.is_empty() => Ok(model),
            _ => Err(SchemaValidationError::new(issues)),
        }
    }
}

impl<T> Resolver for TypedResolver<T>
where
    T: DeserializeOwned + Serialize + Default + Validate,
{
    fn resolve(&self, values: &FormValues) -> ResolverOutcome {
        let model = match self.parse(values) {
            Ok(model) => model,
            Err(err) => {
                debug!(
                    model = std::any::type_name::<T>(),
                    issue_count = err.inner.len(),
                    "Typed model rejected values"
                );
                return ResolverOutcome::Invalid(FieldErrors::from_issues(err.inner));
            }
        };

        match serde_json::to_value(&model) {
            Ok(Value::Object(validated)) => ResolverOutcome::Valid(validated),
            Ok(other) => ResolverOutcome::Invalid(FieldErrors::from_issues([SchemaIssue::new(
                Vec::<String>::new(),
                format!("Model serialized to a non-object value: {other}"),
            )])),
            Err(e) => ResolverOutcome::Invalid(FieldErrors::from_issues([SchemaIssue::new(
                Vec::<String>::new(),
                e.to_string(),
            )])),
        }
    }

    fn name(&self) -> &str {
        "typed"
    }
}

/// Deserializes `values` into `T`, collecting one issue per failing
/// top-level key.
///
/// Returns the model built with stand-ins for the failing keys, or `None`
/// when no stand-in could make deserialization succeed.
fn deserialize_collecting<T>(values: &FormValues) -> (Option<T>, Vec<SchemaIssue>)
where
    T: DeserializeOwned + Serialize + Default,
{
    let stand_ins = match serde_json::to_value(T::default()) {
        Ok(Value::Object(map)) => map,
        _ => FormValues::new(),
    };
    let mut input = values.clone();
    let mut replaced: Vec<String> = Vec::new();
    let mut issues = Vec::new();

    loop {
        let message = match from_map::<T>(&input) {
            Ok(model) => return (Some(model), issues),
            Err(e) => e.to_string(),
        };
        let culprit = match missing_field(&message) {
            Some(field) => Some((field.to_string(), format!("{field} is required"))),
            None => first_failing_key::<T>(&input, &stand_ins),
        };

        match culprit {
            Some((field, message)) if !replaced.contains(&field) => {
                substitute(&mut input, &stand_ins, &field);
                issues.push(SchemaIssue::field(field.clone(), message));
                replaced.push(field);
            }
            Some(_) => return (None, issues),
            None => {
                issues.push(SchemaIssue::new(Vec::<String>::new(), message));
                return (None, issues);
            }
        }
    }
}

/// Finds the first key, in bag order, whose value fails to deserialize.
///
/// Keys after the candidate are swapped for stand-ins, so a failure can only
/// come from the candidate or an earlier key.
fn first_failing_key<T: DeserializeOwned>(
    input: &FormValues,
    stand_ins: &FormValues,
) -> Option<(String, String)> {
    let keys: Vec<&String> = input.keys().collect();
    (0..keys.len()).find_map(|index| {
        let mut trial = input.clone();
        for key in &keys[index + 1..] {
            substitute(&mut trial, stand_ins, key);
        }
        match from_map::<T>(&trial) {
            Err(e) if missing_field(&e.to_string()).is_none() => {
                Some((keys[index].clone(), e.to_string()))
            }
            _ => None,
        }
    })
}

fn from_map<T: DeserializeOwned>(map: &FormValues) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(map.clone()))
}

/// Replaces `key` with its stand-in, or drops it when `T` has none.
fn substitute(map: &mut FormValues, stand_ins: &FormValues, key: &str) {
    match stand_ins.get(key) {
        Some(value) => {
            map.insert(key.to_string(), value.clone());
        }
        None => map.retain(|k, _| k != key),
    }
}

/// Extracts `x` from serde's "missing field `x`" message.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(&rest[..end])
}
