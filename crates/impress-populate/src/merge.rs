//! Deep default merge of join patches onto records.
//!
//! Precedence rules:
//! - a key present in the patch keeps the patch's value, including `null`
//! - a key only in the base is added to the result
//! - two objects at the same key merge recursively with these rules
//! - two arrays at the same position merge index-wise, and base elements
//!   past the end of the patch array are appended
//! - any other pair keeps the patch value

use serde_json::{Map, Value};

/// Fill the holes in `patch` from `base`.
///
/// ```
/// use impress_populate::defaults_deep;
/// use serde_json::json;
///
/// let merged = defaults_deep(
///     json!({ "owner": { "name": "Amy" } }),
///     json!({ "owner": "u1", "text": "x" }),
/// );
/// assert_eq!(merged, json!({ "owner": { "name": "Amy" }, "text": "x" }));
/// ```
pub fn defaults_deep(patch: Value, base: Value) -> Value {
    match (patch, base) {
        (Value::Object(patch), Value::Object(base)) => Value::Object(merge_maps(patch, base)),
        (Value::Array(patch), Value::Array(base)) => Value::Array(merge_arrays(patch, base)),
        (patch, _) => patch,
    }
}

fn merge_maps(mut patch: Map<String, Value>, base: Map<String, Value>) -> Map<String, Value> {
    for (key, base_value) in base {
        match patch.get_mut(&key) {
            Some(slot) => {
                let patch_value = slot.take();
                *slot = defaults_deep(patch_value, base_value);
            }
            None => {
                patch.insert(key, base_value);
            }
        }
    }
    patch
}

fn merge_arrays(patch: Vec<Value>, base: Vec<Value>) -> Vec<Value> {
    let mut base = base.into_iter();
    let mut merged: Vec<Value> = patch
        .into_iter()
        .map(|p| match base.next() {
            Some(b) => defaults_deep(p, b),
            None => p,
        })
        .collect();
    merged.extend(base);
    merged
}

/// Fold patches onto `base` in order. Each patch takes priority over
/// everything before it, so the last patch wins conflicts. `None` patches
/// are skipped.
pub fn merge_patches<I>(base: Value, patches: I) -> Value
where
    I: IntoIterator<Item = Option<Value>>,
{
    patches
        .into_iter()
        .flatten()
        .fold(base, |acc, patch| defaults_deep(patch, acc))
}
