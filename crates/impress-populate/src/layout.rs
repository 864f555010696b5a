//! Store layout configuration
//!
//! Names the top-level regions of the normalized store. Any path whose first
//! segment is not one of these regions is read from the data region.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{ConfigError, Result};

/// Top-level regions of a freshly synchronized store.
pub const DEFAULT_REGIONS: &[&str] = &["auth", "profile", "ordered", "data"];

/// Shape of the normalized store the engine reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreLayout {
    /// Every recognized top-level region name
    pub regions: Vec<String>,
    /// Region holding collections of records, and the implicit path prefix
    pub data_region: String,
    /// Region holding `{key, value}` lists
    pub ordered_region: String,
    /// Region holding the signed-in user's profile record
    pub profile_region: String,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            regions: DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect(),
            data_region: "data".into(),
            ordered_region: "ordered".into(),
            profile_region: "profile".into(),
        }
    }
}

impl StoreLayout {
    /// Create a layout with the default regions
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extra top-level region, keeping the builder chain
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        if !self.is_region(&region) {
            self.regions.push(region);
        }
        self
    }

    /// Whether `segment` names a top-level region
    pub fn is_region(&self, segment: &str) -> bool {
        self.regions.iter().any(|r| r == segment)
    }

    /// Load a layout from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(json_str)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Serialize the layout to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a layout from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let layout: Self = toml::from_str(toml_str)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Serialize the layout to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate region names
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.is_empty() || region.contains('/') || region.contains('.') {
                return Err(ConfigError::InvalidRegion(region.clone()));
            }
            if !seen.insert(region.as_str()) {
                return Err(ConfigError::DuplicateRegion(region.clone()));
            }
        }

        for role in [&self.data_region, &self.ordered_region, &self.profile_region] {
            if !self.is_region(role) {
                return Err(ConfigError::UnknownRegion(role.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PopulateError;

    #[test]
    fn default_layout_is_valid() {
        let layout = StoreLayout::default();
        assert!(layout.validate().is_ok());
        assert!(layout.is_region("auth"));
        assert!(!layout.is_region("todos"));
    }

    #[test]
    fn with_region_extends_allowlist() {
        let layout = StoreLayout::new().with_region("timestamps").with_region("auth");
        assert!(layout.is_region("timestamps"));
        assert_eq!(layout.regions.len(), DEFAULT_REGIONS.len() + 1);
    }

    #[test]
    fn json_round_trip() {
        let layout = StoreLayout::new().with_region("errors");
        let json = layout.to_json().unwrap();
        assert_eq!(StoreLayout::from_json(&json).unwrap(), layout);
    }

    #[test]
    fn toml_partial_uses_defaults() {
        let layout = StoreLayout::from_toml(
            r#"
            regions = ["auth", "profile", "ordered", "data", "listeners"]
            "#,
        )
        .unwrap();
        assert_eq!(layout.data_region, "data");
        assert!(layout.is_region("listeners"));

        let back = StoreLayout::from_toml(&layout.to_toml().unwrap()).unwrap();
        assert_eq!(back, layout);
    }

    #[test]
    fn rejects_unknown_data_region() {
        let err = StoreLayout::from_json(r#"{"regions": ["auth", "profile", "ordered"]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            PopulateError::Config(ConfigError::UnknownRegion(ref r)) if r == "data"
        ));
    }

    #[test]
    fn rejects_bad_region_names() {
        let mut layout = StoreLayout::default();
        layout.regions.push("a/b".into());
        assert_eq!(
            layout.validate(),
            Err(ConfigError::InvalidRegion("a/b".into()))
        );

        let mut layout = StoreLayout::default();
        layout.regions.push("auth".into());
        assert_eq!(
            layout.validate(),
            Err(ConfigError::DuplicateRegion("auth".into()))
        );
    }
}
