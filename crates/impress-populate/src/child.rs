//! Resolve one join descriptor against one record.
//!
//! Lookups are made relative to the data region of the store, e.g. a
//! descriptor with root `users` and key `u1` reads `data/users/u1`. A key
//! that does not resolve to a truthy value leaves the reference as it was.

use serde_json::{Map, Value};

use crate::descriptor::JoinDescriptor;
use crate::path::get_in;
use crate::predicates::is_truthy;

/// Shape of the value held in a join field.
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignKey<'a> {
    /// One key; numbers are rendered in decimal
    Single(String),
    /// Has-many mapping of keys to `true` markers or foreign keys
    HasMany(&'a Map<String, Value>),
    /// Has-many list of foreign keys
    List(&'a [Value]),
}

impl<'a> ForeignKey<'a> {
    /// Classify a join field value. Booleans and `null` are not foreign keys.
    pub fn classify(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(ForeignKey::Single(s.clone())),
            Value::Number(n) => Some(ForeignKey::Single(n.to_string())),
            Value::Object(map) => Some(ForeignKey::HasMany(map)),
            Value::Array(items) => Some(ForeignKey::List(items)),
            Value::Bool(_) | Value::Null => None,
        }
    }
}

/// Resolve `descriptor` for `record`.
///
/// Returns `None` when the record has no truthy value at `descriptor.child`.
/// Otherwise returns a patch object holding the joined value under the
/// output field. When a single key does not resolve, the patch carries the
/// original key under `child` so merging it changes nothing.
pub fn populate_child(data: &Value, record: &Value, descriptor: &JoinDescriptor) -> Option<Value> {
    let child_val = get_in(record, &descriptor.child_segments())?;
    if !is_truthy(child_val) {
        return None;
    }

    let output = descriptor.output_field();
    match ForeignKey::classify(child_val)? {
        ForeignKey::Single(key) => match lookup_target(data, descriptor, &key) {
            Some(found) => Some(field_patch(
                output,
                annotate(found.clone(), descriptor, child_val),
            )),
            None => {
                tracing::trace!(child = %descriptor.child, root = %descriptor.root, %key, "unresolved reference");
                Some(field_patch(&descriptor.child, child_val.clone()))
            }
        },
        ForeignKey::HasMany(map) => Some(field_patch(
            output,
            Value::Object(build_child_list(data, map, descriptor)),
        )),
        ForeignKey::List(items) => Some(field_patch(
            output,
            Value::Array(build_child_array(data, items, descriptor)),
        )),
    }
}

/// Resolve every entry of a has-many mapping, keeping key order.
///
/// An entry resolves by its key when its value is `true` or the descriptor
/// populates by key, otherwise by its value. Entries that do not resolve
/// keep their original value.
pub fn build_child_list(
    data: &Value,
    list: &Map<String, Value>,
    descriptor: &JoinDescriptor,
) -> Map<String, Value> {
    list.iter()
        .map(|(key, val)| {
            let by_key = *val == Value::Bool(true) || descriptor.populate_by_key;
            let (lookup_key, annotation) = if by_key {
                (Some(key.clone()), Value::String(key.clone()))
            } else {
                (scalar_key(val), val.clone())
            };

            let resolved = lookup_key
                .as_deref()
                .and_then(|k| lookup_target(data, descriptor, k))
                .map(|found| annotate(found.clone(), descriptor, &annotation));

            (key.clone(), resolved.unwrap_or_else(|| val.clone()))
        })
        .collect()
}

/// Resolve every element of a has-many list. Elements that are not keys, or
/// that do not resolve, are kept as they are.
pub fn build_child_array(data: &Value, items: &[Value], descriptor: &JoinDescriptor) -> Vec<Value> {
    items
        .iter()
        .map(|item| {
            scalar_key(item)
                .and_then(|k| lookup_target(data, descriptor, &k))
                .map(|found| annotate(found.clone(), descriptor, item))
                .unwrap_or_else(|| item.clone())
        })
        .collect()
}

fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lookup_target<'a>(data: &'a Value, descriptor: &JoinDescriptor, key: &str) -> Option<&'a Value> {
    get_in(data, &descriptor.target_segments(key)).filter(|v| is_truthy(v))
}

/// Put the key under `key_prop` ahead of the record's own fields. A field
/// of the same name on the record wins. Non-object values pass through.
fn annotate(found: Value, descriptor: &JoinDescriptor, key: &Value) -> Value {
    match (descriptor.key_prop.as_deref(), found) {
        (Some(prop), Value::Object(fields)) => {
            let mut annotated = Map::new();
            annotated.insert(prop.to_string(), key.clone());
            annotated.extend(fields);
            Value::Object(annotated)
        }
        (_, found) => found,
    }
}

/// Build `{a: {b: value}}` for the dotted field `a.b`.
fn field_patch(field: &str, value: Value) -> Value {
    field
        .rsplit('.')
        .fold(value, |inner, segment| {
            let mut map = Map::new();
            map.insert(segment.to_string(), inner);
            Value::Object(map)
        })
}
