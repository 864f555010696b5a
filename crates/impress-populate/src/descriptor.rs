//! Join descriptors and populate configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{PopulateError, Result};
use crate::path::path_segments;

/// Declares that a record field is a foreign key into a store collection.
///
/// Serialized with camelCase keys (`childAlias`, `childParam`, `keyProp`,
/// `populateByKey`). Deserialization also accepts the `"child:root"`
/// shorthand string.
///
/// `child` and `root` are required; a descriptor with either empty is a
/// caller error and simply never resolves anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDescriptor")]
pub struct JoinDescriptor {
    /// Field on the source record holding the foreign key(s). May be a
    /// dotted path to a nested field.
    pub child: String,
    /// Collection under the data region that the key indexes into, e.g. `users`.
    pub root: String,
    /// Output field name; defaults to `child`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_alias: Option<String>,
    /// Sub-path under the referenced record to project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_param: Option<String>,
    /// Annotate each resolved record with its key under this field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_prop: Option<String>,
    /// Resolve a has-many mapping by its keys, ignoring its values.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub populate_by_key: bool,
}

impl JoinDescriptor {
    pub fn new(child: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            root: root.into(),
            child_alias: None,
            child_param: None,
            key_prop: None,
            populate_by_key: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.child_alias = Some(alias.into());
        self
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.child_param = Some(param.into());
        self
    }

    pub fn with_key_prop(mut self, key_prop: impl Into<String>) -> Self {
        self.key_prop = Some(key_prop.into());
        self
    }

    pub fn by_key(mut self) -> Self {
        self.populate_by_key = true;
        self
    }

    /// Field the resolved value is written to.
    pub fn output_field(&self) -> &str {
        self.child_alias.as_deref().unwrap_or(&self.child)
    }

    /// Segments of `child`, so nested foreign keys can be read.
    pub fn child_segments(&self) -> Vec<String> {
        self.child.split('.').map(str::to_string).collect()
    }

    /// Lookup path, relative to the data region, of the record for `key`.
    pub fn target_segments(&self, key: &str) -> Vec<String> {
        let mut segments = path_segments(&self.root);
        segments.push(key.to_string());
        if let Some(param) = &self.child_param {
            segments.extend(path_segments(param));
        }
        segments
    }
}

impl FromStr for JoinDescriptor {
    type Err = PopulateError;

    /// Parse the `child:root` shorthand, e.g. `owner:users`.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((child, root)) if !child.trim().is_empty() && !root.trim().is_empty() => {
                Ok(Self::new(child.trim(), root.trim()))
            }
            _ => Err(PopulateError::InvalidDescriptor(s.to_string())),
        }
    }
}

impl fmt::Display for JoinDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.child, self.root)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDescriptor {
    Shorthand(String),
    Full(DescriptorFields),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorFields {
    child: String,
    root: String,
    #[serde(default)]
    child_alias: Option<String>,
    #[serde(default)]
    child_param: Option<String>,
    #[serde(default)]
    key_prop: Option<String>,
    #[serde(default)]
    populate_by_key: bool,
}

impl TryFrom<RawDescriptor> for JoinDescriptor {
    type Error = PopulateError;

    fn try_from(raw: RawDescriptor) -> Result<Self> {
        match raw {
            RawDescriptor::Shorthand(s) => s.parse(),
            RawDescriptor::Full(f) => Ok(Self {
                child: f.child,
                root: f.root,
                child_alias: f.child_alias,
                child_param: f.child_param,
                key_prop: f.key_prop,
                populate_by_key: f.populate_by_key,
            }),
        }
    }
}

/// One descriptor or several, as produced by a dynamic configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Joins {
    One(JoinDescriptor),
    Many(Vec<JoinDescriptor>),
}

impl Joins {
    pub fn into_vec(self) -> Vec<JoinDescriptor> {
        match self {
            Joins::One(d) => vec![d],
            Joins::Many(ds) => ds,
        }
    }
}

impl From<JoinDescriptor> for Joins {
    fn from(d: JoinDescriptor) -> Self {
        Joins::One(d)
    }
}

impl From<Vec<JoinDescriptor>> for Joins {
    fn from(ds: Vec<JoinDescriptor>) -> Self {
        Joins::Many(ds)
    }
}

/// Computes the joins for one item from its key and record.
pub type JoinFn = dyn Fn(&str, &Value) -> Joins + Send + Sync;

/// Populate configuration: a fixed descriptor list, or a function evaluated
/// per populated item so join topology can depend on the data.
#[derive(Clone)]
pub enum PopulateConfig {
    Static(Vec<JoinDescriptor>),
    Dynamic(Arc<JoinFn>),
}

impl PopulateConfig {
    /// Wrap a closure as a dynamic configuration.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&str, &Value) -> Joins + Send + Sync + 'static,
    {
        PopulateConfig::Dynamic(Arc::new(f))
    }

    /// Parse a static configuration from JSON: a descriptor, a shorthand
    /// string, or a list of either.
    pub fn from_json(json_str: &str) -> Result<Self> {
        let joins: Joins = serde_json::from_str(json_str)?;
        Ok(PopulateConfig::Static(joins.into_vec()))
    }

    /// Parse a list of `child:root` shorthands.
    pub fn from_shorthand<S: AsRef<str>>(items: &[S]) -> Result<Self> {
        let descriptors = items
            .iter()
            .map(|s| s.as_ref().parse::<JoinDescriptor>())
            .collect::<Result<Vec<_>>>()?;
        Ok(PopulateConfig::Static(descriptors))
    }

    /// Descriptors for one item, in configuration order.
    pub fn normalize<'a>(&'a self, key: &str, record: &Value) -> Cow<'a, [JoinDescriptor]> {
        match self {
            PopulateConfig::Static(ds) => Cow::Borrowed(ds.as_slice()),
            PopulateConfig::Dynamic(f) => Cow::Owned(f(key, record).into_vec()),
        }
    }
}

impl fmt::Debug for PopulateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopulateConfig::Static(ds) => f.debug_tuple("Static").field(ds).finish(),
            PopulateConfig::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<Vec<JoinDescriptor>> for PopulateConfig {
    fn from(ds: Vec<JoinDescriptor>) -> Self {
        PopulateConfig::Static(ds)
    }
}

impl From<JoinDescriptor> for PopulateConfig {
    fn from(d: JoinDescriptor) -> Self {
        PopulateConfig::Static(vec![d])
    }
}

/// Uniform descriptor list for one item. See [`PopulateConfig::normalize`].
pub fn normalize_configs<'a>(
    populates: &'a PopulateConfig,
    key: &str,
    record: &Value,
) -> Cow<'a, [JoinDescriptor]> {
    populates.normalize(key, record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shorthand_parses() {
        let d: JoinDescriptor = "owner:users".parse().unwrap();
        assert_eq!(d, JoinDescriptor::new("owner", "users"));
        assert_eq!(d.to_string(), "owner:users");

        assert!("owner".parse::<JoinDescriptor>().is_err());
        assert!(":users".parse::<JoinDescriptor>().is_err());
    }

    #[test]
    fn deserializes_camel_case() {
        let d: JoinDescriptor = serde_json::from_value(json!({
            "child": "collaborators",
            "root": "users",
            "childAlias": "team",
            "keyProp": "uid",
            "populateByKey": true
        }))
        .unwrap();
        assert_eq!(d.output_field(), "team");
        assert_eq!(d.key_prop.as_deref(), Some("uid"));
        assert!(d.populate_by_key);
        assert!(d.child_param.is_none());
    }

    #[test]
    fn serializes_only_set_fields() {
        let d = JoinDescriptor::new("owner", "users").with_param("name");
        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!({ "child": "owner", "root": "users", "childParam": "name" })
        );
    }

    #[test]
    fn config_from_json_mixed() {
        let config =
            PopulateConfig::from_json(r#"["owner:users", {"child": "project", "root": "projects"}]"#)
                .unwrap();
        let ds = config.normalize("todos", &Value::Null);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[1].root, "projects");

        let single = PopulateConfig::from_json(r#"{"child": "owner", "root": "users"}"#).unwrap();
        assert_eq!(single.normalize("todos", &Value::Null).len(), 1);

        assert!(PopulateConfig::from_json(r#"["owner"]"#).is_err());
    }

    #[test]
    fn dynamic_config_sees_key_and_record() {
        let config = PopulateConfig::dynamic(|key, record| {
            if record.get("team").is_some() {
                vec![
                    JoinDescriptor::new("owner", "users"),
                    JoinDescriptor::new("team", format!("teams/{key}")),
                ]
                .into()
            } else {
                JoinDescriptor::new("owner", "users").into()
            }
        });

        let ds = normalize_configs(&config, "p1", &json!({ "team": "t1" }));
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[1].root, "teams/p1");

        let ds = normalize_configs(&config, "p2", &json!({}));
        assert_eq!(ds.to_vec(), vec![JoinDescriptor::new("owner", "users")]);
    }

    #[test]
    fn static_config_is_borrowed() {
        let config = PopulateConfig::from(JoinDescriptor::new("owner", "users"));
        assert!(matches!(
            config.normalize("k", &Value::Null),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn target_segments_include_param() {
        let d = JoinDescriptor::new("owner", "/users/").with_param("profile/name");
        assert_eq!(d.target_segments("u1"), vec!["users", "u1", "profile", "name"]);
    }
}
