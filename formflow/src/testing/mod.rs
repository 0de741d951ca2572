//! Testing utilities for formflow forms.
//!
//! This module provides:
//! - Recording and scripted validators, focus and resolver doubles
//! - Signup fixtures in every schema technology
//! - Assertions for form errors and resolver outcomes

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_field_error, assert_form_clean, assert_no_field_error, assert_outcome_errors,
    assert_outcome_valid,
};
pub use fixtures::{
    form_values, invalid_signup, signup_form, signup_json_schema, signup_json_schema_resolver,
    signup_object_resolver, signup_object_schema, signup_rules, signup_typed_resolver,
    signup_with_extra, valid_signup, SignupModel,
};
pub use mocks::{
    RecordingFocus, RecordingValidator, ScriptedValidator, StaticResolver, TestSubmitEvent,
};
