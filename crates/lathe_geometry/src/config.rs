//! Geometry build settings
//!
//! Loaded from TOML; every field is optional:
//!
//! ```toml
//! tolerance = 0.05
//! fallback_quad_size = 1.0
//! fallback_font = "Inter"
//! system_fonts = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Settings shared by every build in a render context
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Flattening and fill tolerance for text outlines
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
    /// Edge length of the quad built for unknown descriptor kinds
    #[serde(default = "default_fallback_quad_size")]
    pub fallback_quad_size: f32,
    /// Font used when a requested font is not found
    #[serde(default)]
    pub fallback_font: Option<String>,
    /// Resolve font names against installed system fonts
    #[serde(default = "default_system_fonts")]
    pub system_fonts: bool,
}

fn default_tolerance() -> f32 {
    0.05
}

fn default_fallback_quad_size() -> f32 {
    1.0
}

fn default_system_fonts() -> bool {
    true
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            fallback_quad_size: default_fallback_quad_size(),
            fallback_font: None,
            system_fonts: default_system_fonts(),
        }
    }
}

impl GeometryConfig {
    /// Parse from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded geometry config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = GeometryConfig::from_toml_str("fallback_font = \"Inter\"").unwrap();
        assert_eq!(config.tolerance, 0.05);
        assert_eq!(config.fallback_quad_size, 1.0);
        assert_eq!(config.fallback_font.as_deref(), Some("Inter"));
        assert!(config.system_fonts);

        let config = GeometryConfig::from_toml_str("system_fonts = false").unwrap();
        assert!(!config.system_fonts);

        assert_eq!(GeometryConfig::from_toml_str("").unwrap(), GeometryConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = GeometryConfig::from_toml_str("tolerance = \"fine\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GeometryConfig::load(Path::new("/nonexistent/lathe.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
