//! Recording and scripted test doubles.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

use crate::core::FormValues;
use crate::form::{FieldFocus, SubmitEvent};
use crate::resolvers::{Resolver, ResolverOutcome};
use crate::rules::{FieldRules, FieldValidator, RuleValidator};
use crate::store::ErrorBag;

/// A field validator that records every call and delegates to a
/// [`RuleValidator`].
#[derive(Debug, Default)]
pub struct RecordingValidator {
    inner: RuleValidator,
    calls: Mutex<Vec<(String, Option<Value>)>>,
}

impl RecordingValidator {
    /// Creates a recorder around the default rule validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder around a configured rule validator.
    #[must_use]
    pub fn wrapping(inner: RuleValidator) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of times the validator was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the validated field names in call order.
    #[must_use]
    pub fn called_fields(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Returns every `(field, value)` the validator saw.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Option<Value>)> {
        self.calls.lock().clone()
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

impl FieldValidator for RecordingValidator {
    fn validate_field(
        &self,
        name: &str,
        value: Option<&Value>,
        rules: &FieldRules,
        errors: &ErrorBag,
    ) -> bool {
        self.calls.lock().push((name.to_string(), value.cloned()));
        self.inner.validate_field(name, value, rules, errors)
    }
}

/// A field validator with a fixed verdict per field.
///
/// Fields without a scripted verdict pass. A failing field gets the
/// scripted message written to the error bag.
#[derive(Debug, Default)]
pub struct ScriptedValidator {
    verdicts: HashMap<String, Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedValidator {
    /// Creates a validator that passes everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `name` fail with `message`.
    #[must_use]
    pub fn failing(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.verdicts.insert(name.into(), Some(message.into()));
        self
    }

    /// Makes `name` pass.
    #[must_use]
    pub fn passing(mut self, name: impl Into<String>) -> Self {
        self.verdicts.insert(name.into(), None);
        self
    }

    /// Returns the number of times the validator was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the validated field names in call order.
    #[must_use]
    pub fn called_fields(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl FieldValidator for ScriptedValidator {
    fn validate_field(
        &self,
        name: &str,
        _value: Option<&Value>,
        _rules: &FieldRules,
        errors: &ErrorBag,
    ) -> bool {
        self.calls.lock().push(name.to_string());
        match self.verdicts.get(name) {
            Some(Some(message)) => {
                errors.set(name, message.clone());
                false
            }
            _ => {
                errors.clear(name);
                true
            }
        }
    }
}

/// A focus capability that records requested fields.
#[derive(Debug)]
pub struct RecordingFocus {
    found: bool,
    focused: Mutex<Vec<String>>,
}

impl Default for RecordingFocus {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingFocus {
    /// Creates a recorder that reports every field as found.
    #[must_use]
    pub fn new() -> Self {
        Self {
            found: true,
            focused: Mutex::new(Vec::new()),
        }
    }

    /// Creates a recorder that reports no field as found.
    #[must_use]
    pub fn missing_elements() -> Self {
        Self {
            found: false,
            focused: Mutex::new(Vec::new()),
        }
    }

    /// Returns the focused fields in order.
    #[must_use]
    pub fn focused(&self) -> Vec<String> {
        self.focused.lock().clone()
    }

    /// Returns the number of focus requests.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.focused.lock().len()
    }
}

impl FieldFocus for RecordingFocus {
    fn focus(&self, name: &str) -> bool {
        self.focused.lock().push(name.to_string());
        self.found
    }
}

/// A resolver returning a fixed outcome and recording its inputs.
#[derive(Debug)]
pub struct StaticResolver {
    outcome: ResolverOutcome,
    seen: Mutex<Vec<FormValues>>,
}

impl StaticResolver {
    /// Creates a resolver that always returns `outcome`.
    #[must_use]
    pub fn new(outcome: ResolverOutcome) -> Self {
        Self {
            outcome,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Creates a resolver that accepts and echoes every input.
    #[must_use]
    pub fn accepting() -> Self {
        Self::new(ResolverOutcome::Valid(FormValues::new()))
    }

    /// Returns the number of times the resolver was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.seen.lock().len()
    }

    /// Returns the value bags the resolver received.
    #[must_use]
    pub fn seen(&self) -> Vec<FormValues> {
        self.seen.lock().clone()
    }
}

impl Resolver for StaticResolver {
    fn resolve(&self, values: &FormValues) -> ResolverOutcome {
        self.seen.lock().push(values.clone());
        match &self.outcome {
            ResolverOutcome::Valid(fixed) if fixed.is_empty() => {
                ResolverOutcome::Valid(values.clone())
            }
            outcome => outcome.clone(),
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// A submit event that records `prevent_default`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestSubmitEvent {
    /// Set once `prevent_default` is called.
    pub default_prevented: bool,
}

impl TestSubmitEvent {
    /// Creates a fresh event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubmitEvent for TestSubmitEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
