//! Path parsing and lookup inside the state tree.
//!
//! Paths are slash separated (`todos/user1`), with an optional leading slash.
//! Dots are accepted as separators too, so `todos/user1.text` and
//! `todos.user1.text` address the same value.

use serde_json::Value;

use crate::layout::StoreLayout;
use crate::predicates::is_truthy;

/// Prefix a path with `/` unless it already has one.
///
/// # Examples
/// ```
/// use impress_populate::fix_path;
/// assert_eq!(fix_path("todos"), "/todos");
/// assert_eq!(fix_path("/todos"), "/todos");
/// ```
pub fn fix_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Split a path into its key segments, dropping empty ones.
pub fn path_segments(path: &str) -> Vec<String> {
    path.split(['/', '.'])
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonical dot form of a path, e.g. `/todos/1` becomes `todos.1`.
pub fn dot_path(path: &str) -> String {
    path_segments(path).join(".")
}

/// Walk `segments` down from `tree`.
///
/// Arrays are indexed by numeric segments. Returns `None` as soon as a
/// segment is missing or the current node is a scalar.
pub fn get_in<'a, S: AsRef<str>>(tree: &'a Value, segments: &[S]) -> Option<&'a Value> {
    segments.iter().try_fold(tree, |node, segment| {
        let segment = segment.as_ref();
        match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    })
}

/// Borrowing form of [`resolve_path`]: `None` when nothing is stored at `path`.
pub fn lookup<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    get_in(tree, &path_segments(path))
}

/// Read the value at `path`, falling back to `not_set` when any segment is
/// absent. An empty path resolves to the tree itself.
///
/// A falsy tree (`null`, `false`, ...) has nothing loaded and always yields
/// `not_set`. A stored `null` is returned as `null`, not as `not_set`.
pub fn resolve_path(tree: &Value, path: &str, not_set: Value) -> Value {
    if !is_truthy(tree) {
        return not_set;
    }
    lookup(tree, path).cloned().unwrap_or(not_set)
}

/// Segments of `path` with the data region prepended unless the first segment
/// already names a top-level region.
pub fn region_segments(layout: &StoreLayout, path: &str) -> Vec<String> {
    let mut segments = path_segments(path);
    let in_region = segments.first().is_some_and(|s| layout.is_region(s));
    if !in_region {
        segments.insert(0, layout.data_region.clone());
    }
    segments
}

/// Read a value stored under the data region, e.g. `data_at(store, "todos", ..)`
/// reads `data/todos`.
pub fn data_at(store: &Value, path: &str, not_set: Value) -> Value {
    region_at(store, "data", path, not_set)
}

/// Read a `{key, value}` list stored under the ordered region.
pub fn ordered_at(store: &Value, path: &str, not_set: Value) -> Value {
    region_at(store, "ordered", path, not_set)
}

fn region_at(store: &Value, region: &str, path: &str, not_set: Value) -> Value {
    let mut segments = vec![region.to_string()];
    segments.extend(path_segments(path));
    if !is_truthy(store) {
        return not_set;
    }
    get_in(store, &segments).cloned().unwrap_or(not_set)
}
