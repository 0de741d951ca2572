//! # Formflow
//!
//! Form state and validation for reactive front-ends.
//!
//! Formflow provides a structured approach to form handling with support for:
//!
//! - **Observable state**: a value bag, an error bag and per-field watchers
//! - **Field rules**: required, length, bounds, pattern and custom checks
//!   evaluated in a fixed order
//! - **Schema resolvers**: JSON Schema, a declarative object schema, or a
//!   serde model validating the whole form at once
//! - **Submission**: validate-all with focus on the first failing field, and
//!   submit handlers that only fire on valid state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formflow::prelude::*;
//!
//! let form = Form::new(
//!     FormOptions::new().with_defaults_json(json!({"name": "", "email": ""}))?,
//! );
//! let name = form.register("name", Some(FieldRules::new().required()));
//!
//! name.on_input(json!("Jack"))?;
//!
//! let mut submit = form.handle_submit(|values| println!("{values:?}"));
//! submit(&mut event);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod errors;
pub mod events;
pub mod form;
pub mod observability;
pub mod resolvers;
pub mod rules;
pub mod store;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{FormValues, MaxLengthMode, ValidationStrategy};
    pub use crate::errors::{FormError, SchemaIssue, SchemaValidationError};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::form::{
        FieldBinding, FieldFocus, Form, FormConfig, FormOptions, NoOpFieldFocus, SubmitEvent,
    };
    pub use crate::observability::{init_logging, LogFormat};
    pub use crate::resolvers::{
        FieldErrors, FieldSchema, JsonSchemaResolver, ObjectSchema, ObjectSchemaResolver,
        Resolver, ResolverOutcome, TypedResolver, Validate,
    };
    pub use crate::rules::{FieldRules, FieldValidator, RuleValidator};
    pub use crate::store::{WatchHandle, WatchOptions, WatchTarget};
}
