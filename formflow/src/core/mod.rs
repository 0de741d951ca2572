//! Core value handling shared across formflow.
//!
//! This module contains:
//! - The `FormValues` snapshot type
//! - Loose coercion helpers used by rules
//! - Behavior switches for rule evaluation and full-form validation

mod mode;
mod value;

pub use mode::{MaxLengthMode, ValidationStrategy};
pub use value::{
    display_len, is_present, is_truthy, to_display_string, to_finite_number, FormValues,
};
