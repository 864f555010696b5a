//! Error types for impress-populate
//!
//! Population itself never fails: an unresolved reference is left in place.
//! Errors only come from the configuration edges (layouts and descriptors).

use thiserror::Error;

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, PopulateError>;

/// Main error type for impress-populate
#[derive(Error, Debug)]
pub enum PopulateError {
    /// A `child:root` shorthand that does not name both halves
    #[error("Invalid join descriptor: {0}")]
    InvalidDescriptor(String),

    /// Store layout failed validation
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Store layout validation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A region name is empty or contains a separator
    #[error("Invalid region name: {0:?}")]
    InvalidRegion(String),

    /// A region appears more than once in the allowlist
    #[error("Duplicate region: {0}")]
    DuplicateRegion(String),

    /// A named role (data, ordered, profile) points at a region outside the allowlist
    #[error("Region {0} is not in the top-level region list")]
    UnknownRegion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PopulateError::InvalidDescriptor("owner".into());
        assert!(err.to_string().contains("owner"));

        let err = PopulateError::from(ConfigError::UnknownRegion("cache".into()));
        assert_eq!(
            err.to_string(),
            "Config error: Region cache is not in the top-level region list"
        );
    }

    #[test]
    fn json_error_converts() {
        let err: PopulateError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, PopulateError::Json(_)));
    }
}
