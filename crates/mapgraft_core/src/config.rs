//! Import options.
//!
//! An [`ImportConfig`] is built once by the caller before a run starts and is
//! only ever read while the run is in progress.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading an import config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Options controlling what gets imported and how placements are annotated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Import the `Instances` category (static models)
    pub import_objects: bool,

    /// Share one base placement across consecutive entries with equal scale
    pub instance_objects: bool,

    /// Force terrain models onto the dev material
    pub override_terrain_materials: bool,

    /// Force every model onto the dev material with a random render colour
    pub override_all_materials: bool,

    /// Flag small models as detail geometry and large ones as occluders
    pub autoset_detail: bool,

    /// Import the `Lights` category
    pub import_lights: bool,

    /// Import the `Cubemaps` category as light probe volumes
    pub import_cubemaps: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            import_objects: true,
            instance_objects: true,
            override_terrain_materials: false,
            override_all_materials: false,
            autoset_detail: true,
            import_lights: false,
            import_cubemaps: false,
        }
    }
}

impl ImportConfig {
    /// Parse a config from JSON text. Missing keys keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a config from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert!(config.import_objects);
        assert!(config.instance_objects);
        assert!(config.autoset_detail);
        assert!(!config.override_terrain_materials);
        assert!(!config.override_all_materials);
        assert!(!config.import_lights);
        assert!(!config.import_cubemaps);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ImportConfig::from_json_str(r#"{ "instance_objects": false, "import_lights": true }"#).unwrap();
        assert!(!config.instance_objects);
        assert!(config.import_lights);
        assert!(config.import_objects);
        assert!(config.autoset_detail);
    }

    #[test]
    fn test_invalid_json() {
        let err = ImportConfig::from_json_str(r#"{ "instance_objects": "yes" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
