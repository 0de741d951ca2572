//! Test assertions for forms and resolver outcomes.

use crate::form::Form;
use crate::resolvers::ResolverOutcome;

/// Asserts that `field` currently has exactly `expected` as its error.
pub fn assert_field_error(form: &Form, field: &str, expected: &str) {
    let actual = form.error(field);
    assert_eq!(
        actual.as_deref(),
        Some(expected),
        "Expected error {:?} on field '{}', got {:?}",
        expected,
        field,
        actual
    );
}

/// Asserts that `field` has no error message.
pub fn assert_no_field_error(form: &Form, field: &str) {
    let actual = form.error(field);
    assert!(
        actual.is_none(),
        "Expected no error on field '{}', got {:?}",
        field,
        actual
    );
}

/// Asserts that no field of the form has an error message.
pub fn assert_form_clean(form: &Form) {
    let errors = form.store().errors().messages();
    assert!(errors.is_empty(), "Expected no errors, got {:?}", errors);
}

/// Asserts that the outcome is valid.
pub fn assert_outcome_valid(outcome: &ResolverOutcome) {
    assert!(
        outcome.is_valid(),
        "Expected valid outcome, got errors: {:?}",
        outcome.errors()
    );
}

/// Asserts that the outcome is invalid with errors on exactly `fields`, in
/// report order.
pub fn assert_outcome_errors(outcome: &ResolverOutcome, fields: &[&str]) {
    let Some(errors) = outcome.errors() else {
        panic!("Expected invalid outcome, got values: {:?}", outcome.values());
    };
    assert_eq!(
        errors.keys(),
        fields,
        "Expected errors on {:?}, got {:?}",
        fields,
        errors
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FormValues;
    use crate::resolvers::FieldErrors;

    #[test]
    fn test_outcome_assertions() {
        assert_outcome_valid(&ResolverOutcome::Valid(FormValues::new()));

        let mut errors = FieldErrors::new();
        errors.insert_first("name", "required");
        assert_outcome_errors(&ResolverOutcome::Invalid(errors), &["name"]);
    }

    #[test]
    #[should_panic(expected = "Expected valid outcome")]
    fn test_outcome_valid_panics_on_errors() {
        assert_outcome_valid(&ResolverOutcome::Invalid(FieldErrors::new()));
    }

    #[test]
    fn test_field_assertions() {
        let form = Form::default();
        assert_no_field_error(&form, "name");
        form.store().errors().set("name", "required");
        assert_field_error(&form, "name", "required");
    }
}
