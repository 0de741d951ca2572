//! Full-form validation and submit handling.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::Form;
use crate::core::{FormValues, ValidationStrategy};
use crate::events;
use crate::resolvers::{Resolver, ResolverOutcome};

/// A submit event delivered by the UI binding.
pub trait SubmitEvent {
    /// Stops the host's default submit action.
    fn prevent_default(&mut self);
}

impl Form {
    /// Validates the whole form.
    ///
    /// Every existing error is cleared first. With a resolver, the resolver
    /// alone decides and its errors are written to the error bag. Without
    /// one, registered fields are validated in registration order and the
    /// first failing field is focused; under
    /// [`ValidationStrategy::StopAtFirstError`] no later field is checked.
    pub fn validate_all(&self) -> bool {
        self.inner.store.errors().clear_all();

        let valid = match &self.inner.resolver {
            Some(resolver) => self.validate_with_resolver(resolver.as_ref()),
            None => self.validate_registered(),
        };

        let error_count = self.inner.store.errors().messages().len();
        debug!(form = %self.inner.config.name, valid, error_count, "Form validated");
        self.emit(
            events::VALIDATED,
            json!({ "valid": valid, "error_count": error_count }),
        );
        valid
    }

    fn validate_with_resolver(&self, resolver: &dyn Resolver) -> bool {
        let snapshot = self.values();
        match resolver.resolve(&snapshot) {
            ResolverOutcome::Valid(_) => true,
            ResolverOutcome::Invalid(field_errors) => {
                debug!(
                    form = %self.inner.config.name,
                    resolver = resolver.name(),
                    error_count = field_errors.len(),
                    "Resolver rejected values"
                );
                let errors = self.inner.store.errors();
                for (field, message) in field_errors {
                    errors.set(field, message);
                }
                false
            }
        }
    }

    fn validate_registered(&self) -> bool {
        let entries: Vec<_> = self
            .inner
            .registry
            .read()
            .iter()
            .map(|(name, rules)| (name.to_string(), rules.clone()))
            .collect();

        let mut valid = true;
        for (name, rules) in &entries {
            let value = self.inner.store.values().get(name);
            if self.validate_value(name, value.as_ref(), rules) {
                continue;
            }

            if valid && self.inner.config.focus_on_error && !self.inner.focus.focus(name) {
                debug!(form = %self.inner.config.name, field = %name, "No element to focus");
            }
            valid = false;

            if self.inner.config.validation_strategy == ValidationStrategy::StopAtFirstError {
                break;
            }
        }
        valid
    }

    /// Wraps `on_valid` into a submit handler.
    ///
    /// The handler prevents the event's default action and validates the
    /// form. Only when validation passes is `on_valid` called, with a
    /// snapshot of the values that later writes do not affect.
    pub fn handle_submit<F>(&self, mut on_valid: F) -> impl FnMut(&mut dyn SubmitEvent)
    where
        F: FnMut(FormValues),
    {
        let form = self.clone();
        move |event: &mut dyn SubmitEvent| {
            if let Some(values) = form.submit(event) {
                on_valid(values);
            }
        }
    }

    /// Like [`Form::handle_submit`], converting the snapshot into `T`.
    ///
    /// A snapshot that does not deserialize into `T` is logged and reported
    /// as `form.submit.rejected`; `on_valid` is not called.
    pub fn handle_submit_typed<T, F>(&self, mut on_valid: F) -> impl FnMut(&mut dyn SubmitEvent)
    where
        T: DeserializeOwned,
        F: FnMut(T),
    {
        let form = self.clone();
        move |event: &mut dyn SubmitEvent| {
            let Some(values) = form.submit(event) else {
                return;
            };
            match serde_json::from_value::<T>(Value::Object(values)) {
                Ok(typed) => on_valid(typed),
                Err(e) => {
                    warn!(
                        form = %form.inner.config.name,
                        model = std::any::type_name::<T>(),
                        error = %e,
                        "Submitted values did not match the model"
                    );
                    form.emit(
                        events::SUBMIT_REJECTED,
                        json!({ "reason": "conversion", "error": e.to_string() }),
                    );
                }
            }
        }
    }

    fn submit(&self, event: &mut dyn SubmitEvent) -> Option<FormValues> {
        event.prevent_default();

        if !self.validate_all() {
            let errors = self.inner.store.errors().messages();
            info!(
                form = %self.inner.config.name,
                error_count = errors.len(),
                "Submission rejected"
            );
            self.emit(
                events::SUBMIT_REJECTED,
                json!({ "reason": "validation", "errors": errors }),
            );
            return None;
        }

        let values = self.values();
        info!(form = %self.inner.config.name, field_count = values.len(), "Form submitted");
        self.emit(events::SUBMITTED, json!({ "field_count": values.len() }));
        Some(values)
    }
}
