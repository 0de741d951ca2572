//! The form facade.
//!
//! A [`Form`] ties the observable store, the rules registry, the optional
//! resolver and the injected capabilities together:
//!
//! - `register` returns a [`FieldBinding`] for input/blur handling
//! - `set_value`, `get_value`, `reset` and `watch` operate on state
//! - `validate_all` and `handle_submit` drive full-form validation
//!
//! `Form` is a cheap `Arc` handle; clones share the same state.

mod focus;
mod options;
mod register;
mod state;
mod submission;

#[cfg(test)]
mod form_tests;

pub use focus::{FieldFocus, LoggingFieldFocus, NoOpFieldFocus};
pub use options::{FormConfig, FormOptions};
pub use register::FieldBinding;
pub use submission::SubmitEvent;

#[cfg(test)]
pub use focus::MockFieldFocus;

use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::FormValues;
use crate::events::{self, EventSink};
use crate::resolvers::Resolver;
use crate::rules::{FieldRules, FieldRulesRegistry, FieldValidator};
use crate::store::FormStore;

struct FormInner {
    id: Uuid,
    config: FormConfig,
    defaults: FormValues,
    store: FormStore,
    registry: RwLock<FieldRulesRegistry>,
    resolver: Option<Arc<dyn Resolver>>,
    validator: Arc<dyn FieldValidator>,
    focus: Arc<dyn FieldFocus>,
    sink: Arc<dyn EventSink>,
}

/// A form instance.
#[derive(Clone)]
pub struct Form {
    inner: Arc<FormInner>,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("id", &self.inner.id)
            .field("name", &self.inner.config.name)
            .field("values", &self.inner.store.values().snapshot())
            .field("registered", &self.inner.registry.read().names())
            .field("resolver", &self.inner.resolver.as_ref().map(|r| r.name().to_string()))
            .finish_non_exhaustive()
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new(FormOptions::default())
    }
}

impl Form {
    /// Creates a form from its options.
    #[must_use]
    pub fn new(options: FormOptions) -> Self {
        let id = Uuid::new_v4();
        debug!(
            form = %options.config.name,
            form_id = %id,
            field_count = options.defaults.len(),
            resolver = options.resolver.as_ref().map_or("none", |r| r.name()),
            "Creating form"
        );

        let inner = FormInner {
            id,
            focus: options.resolve_focus(),
            sink: options.resolve_sink(),
            validator: options.resolve_validator(),
            store: FormStore::new(options.defaults.clone()),
            registry: RwLock::new(FieldRulesRegistry::new()),
            resolver: options.resolver,
            defaults: options.defaults,
            config: options.config,
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Creates a form with the given defaults and nothing else configured.
    #[must_use]
    pub fn with_defaults(defaults: FormValues) -> Self {
        Self::new(FormOptions::new().with_defaults(defaults))
    }

    /// The instance id carried in logs and events.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// The form name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// The behavior settings.
    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.inner.config
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &FormStore {
        &self.inner.store
    }

    /// Returns true if a resolver is configured.
    #[must_use]
    pub fn has_resolver(&self) -> bool {
        self.inner.resolver.is_some()
    }

    /// Names with recorded rules, in validation order.
    #[must_use]
    pub fn registered_fields(&self) -> Vec<String> {
        self.inner.registry.read().names()
    }

    /// Rules recorded for `name`.
    #[must_use]
    pub fn rules_for(&self, name: &str) -> Option<FieldRules> {
        self.inner.registry.read().get(name).cloned()
    }

    fn validate_value(&self, name: &str, value: Option<&Value>, rules: &FieldRules) -> bool {
        let errors = self.inner.store.errors();
        let valid = self.inner.validator.validate_field(name, value, rules, errors);
        if !valid {
            self.emit(
                events::FIELD_INVALID,
                serde_json::json!({ "field": name, "message": errors.get(name) }),
            );
        }
        valid
    }

    fn emit(&self, event_type: &str, fields: Value) {
        let payload = events::event_payload(&self.inner.config.name, self.inner.id, fields);
        self.inner.sink.try_emit(event_type, Some(payload));
    }
}
