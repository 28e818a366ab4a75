//! Value coercions used when comparing attendee attributes.
//!
//! Attendee exports come from a JavaScript dashboard, so stored attributes are
//! loosely typed: a flag may be `true`, `"true"` or missing, a price may be a
//! number or a numeric string. These helpers pin down how each kind of value is
//! read as a boolean, a number, or a string, so that every comparison in the
//! evaluator is explicit about it.

use serde_json::{Number, Value};

/// Returns true if the value is "truthy".
///
/// `null`, `false`, `0`, `NaN` and the empty string are falsy. Arrays and
/// objects are always truthy, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerces a value to a number.
///
/// Returns `NaN` for values that have no numeric reading. `null` is treated as
/// NaN (not zero) so that a missing attribute never satisfies a numeric
/// comparison.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => f64::NAN,
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Parses numeric text the way the dashboard did.
///
/// Surrounding whitespace is ignored and blank text reads as zero.
fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // Rust's float parser also accepts "inf" and "nan"; those are not numbers here.
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Coerces a value to display text for substring matching.
///
/// `null` renders as the empty string. Arrays render their elements joined by
/// commas.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Formats a number without a trailing `.0` for integral floats.
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Strict equality between two values.
///
/// Values of different JSON types are never equal. Numbers compare by value,
/// so `119` equals `119.0`.
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        _ => left == right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(-1)));
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&json!(42)), 42.0);
        assert_eq!(to_number(&json!(" 7.5 ")), 7.5);
        assert_eq!(to_number(&json!("")), 0.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!(false)), 0.0);
        assert!(to_number(&json!(null)).is_nan());
        assert!(to_number(&json!("abc")).is_nan());
        assert!(to_number(&json!("nan")).is_nan());
        assert!(to_number(&json!("inf")).is_nan());
        assert!(to_number(&json!([1])).is_nan());
        assert_eq!(to_number(&json!("Infinity")), f64::INFINITY);
    }

    #[test]
    fn test_to_display_string() {
        assert_eq!(to_display_string(&json!(null)), "");
        assert_eq!(to_display_string(&json!("Ana")), "Ana");
        assert_eq!(to_display_string(&json!(119)), "119");
        assert_eq!(to_display_string(&json!(119.0)), "119");
        assert_eq!(to_display_string(&json!(1.5)), "1.5");
        assert_eq!(to_display_string(&json!(true)), "true");
        assert_eq!(to_display_string(&json!(["a", null, 2])), "a,,2");
    }

    #[test]
    fn test_strict_equals() {
        assert!(strict_equals(&json!(119), &json!(119.0)));
        assert!(strict_equals(&json!("paid"), &json!("paid")));
        assert!(!strict_equals(&json!("1"), &json!(1)));
        assert!(!strict_equals(&json!(true), &json!("true")));
        assert!(!strict_equals(&json!(null), &json!("")));
        assert!(strict_equals(&json!(null), &json!(null)));
    }
}
