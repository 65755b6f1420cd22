//! Mapper configuration.
//!
//! Policy knobs for the generic mapper, loadable from a JSON document with
//! camelCase keys. Every key is optional; missing keys take their defaults.
//!
//! ```json
//! { "unmodeledProperties": "reject", "strictEnumNames": false }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What to do with a property or classification the bean schema does not model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmodeledPolicy {
    /// Keep it verbatim in the bean's escape hatch.
    #[default]
    Preserve,
    /// Fail the translation.
    Reject,
    /// Drop it and log a warning.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Applies to unmodeled properties of every category.
    pub unmodeled_properties: UnmodeledPolicy,
    pub unmodeled_classifications: UnmodeledPolicy,
    /// Write extra attributes and extra classifications back on the reverse path.
    pub reemit_extra_attributes: bool,
    /// Require an enum's symbolic name to match the declared name for its ordinal.
    pub strict_enum_names: bool,
    /// Allow range-checked conversion between primitive categories.
    pub allow_narrowing_casts: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            unmodeled_properties: UnmodeledPolicy::Preserve,
            unmodeled_classifications: UnmodeledPolicy::Preserve,
            reemit_extra_attributes: true,
            strict_enum_names: true,
            allow_narrowing_casts: true,
        }
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject anything unmodeled and accept only exact categories.
    pub fn strict() -> Self {
        Self {
            unmodeled_properties: UnmodeledPolicy::Reject,
            unmodeled_classifications: UnmodeledPolicy::Reject,
            reemit_extra_attributes: true,
            strict_enum_names: true,
            allow_narrowing_casts: false,
        }
    }

    /// Parse a configuration document. Unknown keys are rejected so a typo
    /// does not silently fall back to a default.
    ///
    /// Well-formed JSON with the wrong shape is `InvalidConfiguration`;
    /// malformed JSON is `Json`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            if e.is_data() {
                Error::InvalidConfiguration(e.to_string())
            } else {
                Error::Json(e)
            }
        })?;
        tracing::debug!(?config, "loaded mapper configuration");
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_unmodeled_properties(mut self, policy: UnmodeledPolicy) -> Self {
        self.unmodeled_properties = policy;
        self
    }

    pub fn with_unmodeled_classifications(mut self, policy: UnmodeledPolicy) -> Self {
        self.unmodeled_classifications = policy;
        self
    }

    pub fn with_reemit_extra_attributes(mut self, enabled: bool) -> Self {
        self.reemit_extra_attributes = enabled;
        self
    }

    pub fn with_strict_enum_names(mut self, enabled: bool) -> Self {
        self.strict_enum_names = enabled;
        self
    }

    pub fn with_allow_narrowing_casts(mut self, enabled: bool) -> Self {
        self.allow_narrowing_casts = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert_eq!(config.unmodeled_properties, UnmodeledPolicy::Preserve);
        assert!(config.reemit_extra_attributes);
        assert!(config.strict_enum_names);
        assert!(config.allow_narrowing_casts);
    }

    #[test]
    fn test_partial_json() {
        let config = MapperConfig::from_json_str(r#"{"unmodeledProperties":"reject","strictEnumNames":false}"#).unwrap();
        assert_eq!(config.unmodeled_properties, UnmodeledPolicy::Reject);
        assert_eq!(config.unmodeled_classifications, UnmodeledPolicy::Preserve);
        assert!(!config.strict_enum_names);
        assert!(config.allow_narrowing_casts);
    }

    #[test]
    fn test_bad_policy_is_invalid_configuration() {
        let err = MapperConfig::from_json_str(r#"{"unmodeledProperties":"shred"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = MapperConfig::from_json_str(r#"{"unmodeledProperties":"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = MapperConfig::from_json_str(r#"{"strictEnumName":false}"#).unwrap_err();
        match err {
            Error::InvalidConfiguration(reason) => assert!(reason.contains("strictEnumName")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(MapperConfig::from_json_str("42"), Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MapperConfig::from_json_file("/nonexistent/mapper.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
