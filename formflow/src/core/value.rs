//! Loose coercion helpers over JSON field values.
//!
//! Form inputs arrive as strings, numbers, booleans or `null`. Rules compare
//! them the way browser-side form code does: a value is "present" when it is
//! truthy, lengths are measured on the string form, and numeric rules only
//! apply when the value coerces to a finite number.

use serde_json::Value;

/// Snapshot of a value bag: field name to value, in field order.
pub type FormValues = serde_json::Map<String, Value>;

/// Returns true if the value counts as present.
///
/// `null`, `false`, `0`, non-finite numbers and `""` are absent. Empty arrays
/// and objects are present.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Same as [`is_truthy`] for an optional value; `None` is absent.
#[must_use]
pub fn is_present(value: Option<&Value>) -> bool {
    value.is_some_and(is_truthy)
}

/// Renders the value the way it would appear in a text input.
#[must_use]
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Length of the string form, counted in characters.
#[must_use]
pub fn display_len(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        other => to_display_string(other).chars().count(),
    }
}

/// Coerces the value to a finite number, if it has one.
#[must_use]
pub fn to_finite_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    number.filter(|n| n.is_finite())
}

/// Prints floats the way a browser prints a number: positional digits
/// between `1e-6` and `1e21`, exponent form outside that range.
fn format_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.abs() >= 1e21 || f.abs() < 1e-6 => exponent_form(f),
        Some(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

fn exponent_form(f: f64) -> String {
    let text = format!("{f:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));

        assert!(is_truthy(&json!(" ")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_is_present_none() {
        assert!(!is_present(None));
        assert!(is_present(Some(&json!("x"))));
    }

    #[test]
    fn test_display_string() {
        assert_eq!(to_display_string(&json!("abc")), "abc");
        assert_eq!(to_display_string(&json!(25)), "25");
        assert_eq!(to_display_string(&json!(25.0)), "25");
        assert_eq!(to_display_string(&json!(2.5)), "2.5");
        assert_eq!(to_display_string(&json!(true)), "true");
        assert_eq!(to_display_string(&Value::Null), "null");
        assert_eq!(to_display_string(&json!([1, "a", null])), "1,a,");
        assert_eq!(to_display_string(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn test_display_string_exponent_range() {
        assert_eq!(to_display_string(&json!(1e20)), "100000000000000000000");
        assert_eq!(to_display_string(&json!(1e21)), "1e+21");
        assert_eq!(to_display_string(&json!(-1.5e21)), "-1.5e+21");
        assert_eq!(to_display_string(&json!(0.000_001)), "0.000001");
        assert_eq!(to_display_string(&json!(1e-7)), "1e-7");
        assert_eq!(to_display_string(&json!(2.5e-8)), "2.5e-8");
        assert_eq!(to_display_string(&json!(-0.0)), "0");
        assert_eq!(display_len(&json!(1e21)), 5);
    }

    #[test]
    fn test_display_len_counts_chars() {
        assert_eq!(display_len(&json!("héllo")), 5);
        assert_eq!(display_len(&json!(12345)), 5);
    }

    #[test]
    fn test_finite_number_coercion() {
        assert_eq!(to_finite_number(&json!(18)), Some(18.0));
        assert_eq!(to_finite_number(&json!(" 42 ")), Some(42.0));
        assert_eq!(to_finite_number(&json!("4.5")), Some(4.5));
        assert_eq!(to_finite_number(&json!("")), Some(0.0));
        assert_eq!(to_finite_number(&json!(true)), Some(1.0));
        assert_eq!(to_finite_number(&json!("abc")), None);
        assert_eq!(to_finite_number(&json!("inf")), None);
        assert_eq!(to_finite_number(&json!([5])), None);
        assert_eq!(to_finite_number(&Value::Null), None);
    }
}
