//! Population of a store path with joined records.
//!
//! [`Populator::populate`] reads the value at a path, works out its shape
//! once, and joins every configured foreign key it finds. The store is only
//! read; every result is freshly built.

use lazy_static::lazy_static;
use serde_json::{Map, Value};

use crate::child::populate_child;
use crate::descriptor::{JoinDescriptor, PopulateConfig};
use crate::layout::StoreLayout;
use crate::merge::merge_patches;
use crate::path::{get_in, region_segments};
use crate::predicates::is_truthy;

lazy_static! {
    static ref DEFAULT_POPULATOR: Populator = Populator::default();
}

/// Shape of the value found at a populated path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataShape<'a> {
    /// `[{key, value}, ..]` list from the ordered region
    OrderedList(&'a [Value]),
    /// One record exposing at least one join field
    Single(&'a Value),
    /// Mapping of keys to records
    RecordMap(&'a Map<String, Value>),
    /// Left as read: the profile record, or a scalar
    Passthrough(&'a Value),
}

impl<'a> DataShape<'a> {
    /// Classify `data` against the root-level descriptors.
    pub fn classify(data: &'a Value, descriptors: &[JoinDescriptor], is_profile: bool) -> Self {
        match data {
            Value::Array(items) => DataShape::OrderedList(items),
            _ if is_profile => DataShape::Passthrough(data),
            Value::Object(map) => {
                if has_any_child(data, descriptors) {
                    DataShape::Single(data)
                } else {
                    DataShape::RecordMap(map)
                }
            }
            _ => DataShape::Passthrough(data),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataShape::OrderedList(_) => "ordered-list",
            DataShape::Single(_) => "single",
            DataShape::RecordMap(_) => "record-map",
            DataShape::Passthrough(_) => "passthrough",
        }
    }
}

/// Join engine bound to a store layout.
#[derive(Debug, Clone, Default)]
pub struct Populator {
    layout: StoreLayout,
}

impl Populator {
    pub fn new(layout: StoreLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Read `path` from `store` and join the records `populates` points at.
    ///
    /// Paths outside the known regions are read from the data region.
    /// Returns `not_set` when nothing is stored at the path, and `null` when
    /// a `null` is stored there. Records without any configured join field
    /// come back unchanged; references that do not resolve stay as keys.
    pub fn populate(
        &self,
        store: &Value,
        path: &str,
        populates: &PopulateConfig,
        not_set: Value,
    ) -> Value {
        if !is_truthy(store) {
            return not_set;
        }

        let segments = region_segments(&self.layout, path);
        let data = match get_in(store, &segments) {
            Some(data) if *data != not_set => data,
            _ => return not_set,
        };
        if data.is_null() {
            return Value::Null;
        }

        let region = segments.first().map(String::as_str).unwrap_or_default();
        let root_key = segments.last().map(String::as_str).unwrap_or_default();
        let data_region = store.get(&self.layout.data_region).unwrap_or(&Value::Null);
        let descriptors = populates.normalize(root_key, data);

        let shape = DataShape::classify(data, &descriptors, region == self.layout.profile_region);
        tracing::debug!(path, shape = shape.name(), joins = descriptors.len(), "populate");

        match shape {
            DataShape::OrderedList(items) => {
                let has_joins = descriptors.iter().any(|d| {
                    items
                        .iter()
                        .any(|item| item.get("value").is_some_and(|v| has_child(v, d)))
                });
                if !has_joins {
                    return data.clone();
                }
                Value::Array(
                    items
                        .iter()
                        .map(|item| populate_ordered_item(data_region, item, &descriptors))
                        .collect(),
                )
            }
            DataShape::Single(record) => join_record(data_region, record, &descriptors),
            DataShape::RecordMap(map) => {
                let keyed_by_field = region == self.layout.ordered_region;
                Value::Object(
                    map.iter()
                        .map(|(child_key, child)| {
                            let key = if keyed_by_field {
                                child.get("key").and_then(Value::as_str).unwrap_or(child_key)
                            } else {
                                child_key.as_str()
                            };
                            let item_descriptors = populates.normalize(key, child);
                            let populated = if has_any_child(child, &item_descriptors) {
                                join_record(data_region, child, &item_descriptors)
                            } else {
                                child.clone()
                            };
                            (child_key.clone(), populated)
                        })
                        .collect(),
                )
            }
            DataShape::Passthrough(value) => value.clone(),
        }
    }
}

/// Populate `path` using the default store layout.
///
/// See [`Populator::populate`].
pub fn populate(store: &Value, path: &str, populates: &PopulateConfig, not_set: Value) -> Value {
    DEFAULT_POPULATOR.populate(store, path, populates, not_set)
}

fn has_child(record: &Value, descriptor: &JoinDescriptor) -> bool {
    get_in(record, &descriptor.child_segments()).is_some()
}

fn has_any_child(record: &Value, descriptors: &[JoinDescriptor]) -> bool {
    descriptors.iter().any(|d| has_child(record, d))
}

/// Merge every descriptor's patch onto a copy of `record`, last one winning.
fn join_record(data_region: &Value, record: &Value, descriptors: &[JoinDescriptor]) -> Value {
    merge_patches(
        record.clone(),
        descriptors
            .iter()
            .map(|d| populate_child(data_region, record, d)),
    )
}

/// Join the `value` of a `{key, value}` entry, keeping its other fields.
fn populate_ordered_item(data_region: &Value, item: &Value, descriptors: &[JoinDescriptor]) -> Value {
    let Value::Object(entry) = item else {
        return item.clone();
    };
    let Some(value) = entry.get("value") else {
        return item.clone();
    };

    let mut entry = entry.clone();
    entry.insert("value".into(), join_record(data_region, value, descriptors));
    Value::Object(entry)
}
