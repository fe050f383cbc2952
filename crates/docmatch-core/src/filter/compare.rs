//! Value comparators shared by the operator engine

use std::borrow::Cow;
use std::cmp::Ordering;

use super::value::Value;

/// Deep equality
///
/// Dates are equal when they denote the same instant; arrays when they have
/// the same length and pairwise-equal elements; objects when they hold the
/// same keys with equal values.
pub fn equal(a: &Value, b: &Value) -> bool {
    a == b
}

/// Order two values of the same orderable kind
///
/// Numbers, strings and dates are ordered. Any other pairing is unordered,
/// so every ordering operator on it is false.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Date(x), Value::Date(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// `a > b`
pub fn greater(a: &Value, b: &Value) -> bool {
    compare(a, b) == Some(Ordering::Greater)
}

/// `a >= b`
pub fn greater_or_equal(a: &Value, b: &Value) -> bool {
    matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))
}

/// `a < b`
pub fn less(a: &Value, b: &Value) -> bool {
    compare(a, b) == Some(Ordering::Less)
}

/// `a <= b`
pub fn less_or_equal(a: &Value, b: &Value) -> bool {
    matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))
}

/// Element count of an array, character count of a string, key count of an
/// object, zero for anything else
pub fn size(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::String(s) => s.chars().count(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

/// Whether presence of `value` agrees with `should_exist`
///
/// A missing value and `Null` both count as not existing.
pub fn exists(value: Option<&Value>, should_exist: bool) -> bool {
    let present = matches!(value, Some(v) if !v.is_null());
    present == should_exist
}

/// Textual form used by string and regex operators
///
/// Strings are used as-is; numbers and booleans are rendered. Other values
/// have no textual form.
pub fn text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_equal_is_deep() {
        let a = Value::from(json!({ "x": [1, { "y": "z" }] }));
        let b = Value::from(json!({ "x": [1, { "y": "z" }] }));
        let c = Value::from(json!({ "x": [1, { "y": "w" }] }));
        assert!(equal(&a, &b));
        assert!(!equal(&a, &c));
        assert!(!equal(&Value::from(vec![1, 2]), &Value::from(vec![2, 1])));
    }

    #[test]
    fn test_dates_compare_by_instant() {
        let early = Value::Date(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let late = Value::Date(Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap());
        assert!(less(&early, &late));
        assert!(greater_or_equal(&late, &late.clone()));
        assert!(equal(&early, &early.clone()));
    }

    #[test]
    fn test_mixed_kinds_are_unordered() {
        let n = Value::from(5);
        let s = Value::from("5");
        assert_eq!(compare(&n, &s), None);
        assert!(!greater(&n, &s));
        assert!(!less_or_equal(&n, &s));
        assert!(!greater(&Value::from(f64::NAN), &n));
    }

    #[test]
    fn test_string_ordering() {
        assert!(greater(&Value::from("b"), &Value::from("a")));
        assert!(less_or_equal(&Value::from("a"), &Value::from("a")));
    }

    #[test]
    fn test_size() {
        assert_eq!(size(&Value::from(vec![1, 2, 3])), 3);
        assert_eq!(size(&Value::from("héllo")), 5);
        assert_eq!(size(&Value::from(json!({ "a": 1, "b": 2 }))), 2);
        assert_eq!(size(&Value::from(42)), 0);
        assert_eq!(size(&Value::Null), 0);
    }

    #[test]
    fn test_exists() {
        assert!(exists(Some(&Value::from(0)), true));
        assert!(exists(Some(&Value::Null), false));
        assert!(exists(None, false));
        assert!(!exists(None, true));
    }

    #[test]
    fn test_text() {
        assert_eq!(text(&Value::from("abc")).as_deref(), Some("abc"));
        assert_eq!(text(&Value::from(3)).as_deref(), Some("3"));
        assert_eq!(text(&Value::from(2.5)).as_deref(), Some("2.5"));
        assert_eq!(text(&Value::Bool(true)).as_deref(), Some("true"));
        assert!(text(&Value::Null).is_none());
    }
}
