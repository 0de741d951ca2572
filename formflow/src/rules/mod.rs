//! Per-field validation rules.
//!
//! This module provides:
//! - Rule sets attached to fields (`required`, lengths, bounds, pattern,
//!   custom predicate)
//! - The rule validator that evaluates them in a fixed order
//! - The ordered registry the submission pass iterates

mod registry;
mod rule_set;
mod validator;

pub use registry::FieldRulesRegistry;
pub use rule_set::{
    BoundRule, CustomRule, FieldRules, LengthRule, PatternRule, Predicate, RequiredSpec,
    RuleKind, RuleSpec, ThresholdSpec,
};
pub use validator::{
    FieldValidator, RuleValidator, RuleViolation, DEFAULT_INVALID_MESSAGE,
    DEFAULT_REQUIRED_MESSAGE,
};
