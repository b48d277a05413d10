use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LoadError, Result};

/// What the loader does when a class referenced as a supertype cannot be found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingClassPolicy {
    /// Define an empty class (or interface, depending on how it is referenced) in its place.
    #[default]
    Placeholder,
    /// Leave the handle interned but undefined; hierarchy walks stop there.
    Skip,
    /// Fail the load.
    Error,
}

/// Which annotation attributes count as "present" on a class member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationRetention {
    /// `RuntimeVisibleAnnotations` only, matching what reflection reports.
    #[default]
    Runtime,
    /// Also `RuntimeInvisibleAnnotations` (`CLASS` retention).
    All,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    pub missing_classes: MissingClassPolicy,
    pub annotation_retention: AnnotationRetention,
}

impl LoaderConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = LoaderConfig::from_toml_str("").unwrap();
        assert_eq!(config, LoaderConfig::default());
        assert_eq!(config.missing_classes, MissingClassPolicy::Placeholder);
        assert_eq!(config.annotation_retention, AnnotationRetention::Runtime);
    }

    #[test]
    fn parses_policies() {
        let config = LoaderConfig::from_toml_str(
            r#"
            missing_classes = "error"
            annotation_retention = "all"
            "#,
        )
        .unwrap();
        assert_eq!(config.missing_classes, MissingClassPolicy::Error);
        assert_eq!(config.annotation_retention, AnnotationRetention::All);
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        assert!(matches!(
            LoaderConfig::from_toml_str("missing = \"skip\""),
            Err(LoadError::Config(_))
        ));
        assert!(LoaderConfig::from_toml_str("missing_classes = \"ignore\"").is_err());
    }
}
