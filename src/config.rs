//! Serializable configuration for the geometry operations.

use crate::error::{GeometryError, Result};
use crate::simplex::TightSimplexConfig;
use crate::zero::ReplacementConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by the CLI and library entry points.
///
/// Every field has a default, so a YAML file only needs to name the
/// values it overrides:
///
/// ```yaml
/// replacement:
///   delta: 0.001
/// tight_simplex:
///   margin: 0.01
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Reference part for ALR (negative counts from the end).
    pub alr_reference: isize,
    /// Zero replacement settings.
    pub replacement: ReplacementConfig,
    /// Tight simplex fitting settings.
    pub tight_simplex: TightSimplexConfig,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            alr_reference: -1,
            replacement: ReplacementConfig::default(),
            tight_simplex: TightSimplexConfig::default(),
        }
    }
}

impl GeometryConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(GeometryError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(GeometryError::from)
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(GeometryError::from)
    }

    /// Save to pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(GeometryError::from)
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeometryConfig::default();
        assert_eq!(config.alr_reference, -1);
        assert!(config.replacement.delta.is_none());
        assert_eq!(config.tight_simplex.margin, 1e-6);
        assert!(!config.tight_simplex.confine_to_simplex);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "replacement:\n  delta: 0.001\ntight_simplex:\n  confine_to_simplex: true\n";
        let config = GeometryConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.replacement.delta, Some(0.001));
        assert_eq!(config.replacement.scale, 0.1);
        assert!(config.tight_simplex.confine_to_simplex);
        assert_eq!(config.tight_simplex.margin, 1e-6);
        assert_eq!(config.alr_reference, -1);
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = GeometryConfig::default();
        config.alr_reference = 2;
        config.tight_simplex.margin = 0.05;

        let yaml = config.to_yaml().unwrap();
        let parsed = GeometryConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.alr_reference, 2);
        assert_eq!(parsed.tight_simplex.margin, 0.05);

        let json = config.to_json().unwrap();
        let parsed = GeometryConfig::from_json(&json).unwrap();
        assert_eq!(parsed.alr_reference, 2);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            GeometryConfig::from_yaml("alr_reference: [1, 2"),
            Err(GeometryError::Yaml(_))
        ));
    }
}
