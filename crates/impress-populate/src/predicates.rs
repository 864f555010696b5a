//! Loaded/empty classification of state values.
//!
//! Arguments are `Option<&Value>`: `None` stands for a value that has not
//! arrived yet, `Some(&Value::Null)` for one that arrived and is `null`.
//!
//! The two predicates are deliberately asymmetric. [`is_loaded`] requires
//! every argument to be loaded, [`is_empty`] is satisfied by any single empty
//! argument.

use serde_json::Value;

/// Truthiness of a state value.
///
/// `null`, `false`, numeric zero and `""` are falsy. Everything else,
/// including `{}` and `[]`, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Enumerable size: entries of a mapping, elements of a list, characters
/// of a string. Other scalars have size zero.
pub fn value_size(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.len(),
        Value::Array(items) => items.len(),
        Value::String(s) => s.chars().count(),
        _ => 0,
    }
}

/// Whether every item has loaded.
///
/// With no items there is nothing to wait for, so the answer is `true`.
/// An item is loaded when it is present and does not carry
/// `isLoaded: false`.
///
/// # Examples
/// ```
/// use impress_populate::is_loaded;
/// use serde_json::json;
///
/// assert!(is_loaded(&[]));
/// assert!(!is_loaded(&[None]));
/// assert!(!is_loaded(&[Some(&json!({ "isLoaded": false }))]));
/// assert!(is_loaded(&[Some(&json!({})), Some(&json!({ "a": 1 }))]));
/// ```
pub fn is_loaded(items: &[Option<&Value>]) -> bool {
    items.iter().all(|item| match item {
        None => false,
        Some(value) => value.get("isLoaded") != Some(&Value::Bool(false)),
    })
}

/// Whether any item is empty.
///
/// An item is empty when it is missing or falsy, has no entries, or carries
/// `isEmpty: true`. With no items nothing is empty, so the answer is `false`.
///
/// # Examples
/// ```
/// use impress_populate::is_empty;
/// use serde_json::json;
///
/// assert!(is_empty(&[Some(&json!({}))]));
/// assert!(!is_empty(&[Some(&json!({ "a": 1 }))]));
/// assert!(is_empty(&[Some(&json!({})), Some(&json!({ "a": 1 }))]));
/// ```
pub fn is_empty(items: &[Option<&Value>]) -> bool {
    items.iter().any(|item| match item {
        None => true,
        Some(value) => {
            !(is_truthy(value) && value_size(value) > 0)
                || value.get("isEmpty") == Some(&Value::Bool(true))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn no_items_is_loaded_not_empty() {
        assert!(is_loaded(&[]));
        assert!(!is_empty(&[]));
    }

    #[rstest]
    #[case(json!({}), true)]
    #[case(json!(null), true)]
    #[case(json!({ "a": 1 }), true)]
    #[case(json!({ "isLoaded": false }), false)]
    #[case(json!({ "isLoaded": true }), true)]
    #[case(json!({ "isLoaded": null }), true)]
    #[case(json!("text"), true)]
    fn loaded_single(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_loaded(&[Some(&value)]), expected);
    }

    #[test]
    fn loaded_requires_all() {
        let a = json!({ "a": 1 });
        let b = json!({ "isLoaded": false });
        assert!(!is_loaded(&[Some(&a), Some(&b)]));
        assert!(!is_loaded(&[Some(&a), None]));
        assert!(is_loaded(&[Some(&a), Some(&a)]));
    }

    #[rstest]
    #[case(json!({}), true)]
    #[case(json!([]), true)]
    #[case(json!(""), true)]
    #[case(json!(null), true)]
    #[case(json!(false), true)]
    #[case(json!(0), true)]
    #[case(json!(7), true)]
    #[case(json!("ab"), false)]
    #[case(json!([1]), false)]
    #[case(json!({ "a": 1 }), false)]
    #[case(json!({ "isEmpty": true }), true)]
    #[case(json!({ "isEmpty": false }), false)]
    fn empty_single(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_empty(&[Some(&value)]), expected);
    }

    #[test]
    fn empty_any_argument() {
        let empty = json!({});
        let full = json!({ "a": 1 });
        assert!(is_empty(&[Some(&empty), Some(&full)]));
        assert!(is_empty(&[Some(&full), None]));
        assert!(!is_empty(&[Some(&full), Some(&full)]));
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(-1)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
    }

    #[test]
    fn size_counts_chars() {
        assert_eq!(value_size(&json!("héllo")), 5);
        assert_eq!(value_size(&json!(true)), 0);
    }
}
