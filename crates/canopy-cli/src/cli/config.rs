//! Stage configuration files.
//!
//! A config is a small YAML document; every field is optional:
//!
//! ```yaml
//! width: 1024
//! height: 768
//! tree_count: 25
//! tree_height: 80
//! seed: 42
//! # Optional custom silhouette, either inline path data...
//! template_path: "M 0,-64 L 28,0 L -28,0 Z"
//! # ...or the first shape of an SVG file.
//! # template_svg: shapes/pine.svg
//! ```
//!
//! Silhouette outlines are drawn in pixels with the tree origin at `(0, 0)`
//! and y pointing down, and are scaled by `tree_height`.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use canopy::{
    template_from_path_data, template_from_svg, ShapeTemplate, Silhouette, Stage, SvgError,
    TREE_HEIGHT,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Template error: {0}")]
    Template(#[from] SvgError),
}

/// Stage size, tree count and silhouette for a generated scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub width: f64,
    pub height: f64,
    pub tree_count: usize,
    pub tree_height: f64,
    pub seed: Option<u64>,
    /// SVG path data for a custom silhouette.
    pub template_path: Option<String>,
    /// SVG file whose first shape is a custom silhouette.
    pub template_svg: Option<PathBuf>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            tree_count: 10,
            tree_height: TREE_HEIGHT,
            seed: None,
            template_path: None,
            template_svg: None,
        }
    }
}

impl StageConfig {
    /// Load a config from a `.yaml`/`.yml` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => {}
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("(none)").to_string(),
                ))
            }
        }

        let content = fs::read_to_string(path)?;
        let config: StageConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        info!("loaded stage config from {}", path.display());
        Ok(config)
    }

    /// Reject sizes the stage cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Parse(format!("{name} must be positive, got {value}")))
            }
        };
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("tree_height", self.tree_height)
    }

    /// The configured silhouette: a custom template if one is set,
    /// otherwise the built-in tree, at `tree_height`.
    pub fn silhouette(&self) -> Result<Silhouette, ConfigError> {
        self.validate()?;
        let template = match (&self.template_svg, &self.template_path) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Parse(
                    "set either template_svg or template_path, not both".to_string(),
                ))
            }
            (Some(file), None) => {
                let content = fs::read_to_string(file)?;
                template_from_svg(&content, self.tree_height)?
            }
            (None, Some(d)) => template_from_path_data(d, self.tree_height)?,
            (None, None) => ShapeTemplate::tree(),
        };
        Ok(Silhouette::new(template, self.tree_height))
    }

    /// An empty stage at the configured size.
    pub fn stage(&self) -> Result<Stage, ConfigError> {
        Ok(Stage::with_silhouette(self.width, self.height, self.silhouette()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: StageConfig = serde_yaml::from_str("tree_count: 3\nseed: 9\n").unwrap();
        assert_eq!(config.tree_count, 3);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.width, 800.0);
        assert_eq!(config.tree_height, TREE_HEIGHT);
    }

    #[test]
    fn zero_height_is_rejected() {
        let config = StageConfig {
            tree_height: 0.0,
            ..StageConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn non_yaml_extension_is_unsupported() {
        assert!(matches!(
            StageConfig::load("stage.toml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn stage_uses_configured_silhouette() {
        let config = StageConfig {
            tree_height: 50.0,
            ..StageConfig::default()
        };
        assert_eq!(config.stage().unwrap().silhouette().height(), 50.0);
    }

    #[test]
    fn template_path_from_yaml() {
        let config: StageConfig =
            serde_yaml::from_str("tree_height: 100\ntemplate_path: \"M 0,-80 L 40,0 L -40,0 Z\"\n")
                .unwrap();
        let silhouette = config.silhouette().unwrap();
        assert_eq!(silhouette.template().units(), &[(0.0, 0.8), (0.4, 0.0), (-0.4, 0.0)]);
    }

    #[test]
    fn both_template_sources_conflict() {
        let config = StageConfig {
            template_path: Some("M 0,-80 L 40,0 L -40,0 Z".to_string()),
            template_svg: Some(PathBuf::from("pine.svg")),
            ..StageConfig::default()
        };
        assert!(matches!(config.silhouette(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn degenerate_template_path_is_an_error() {
        let config = StageConfig {
            template_path: Some("M 0,0 L 10,0".to_string()),
            ..StageConfig::default()
        };
        assert!(matches!(config.silhouette(), Err(ConfigError::Template(_))));
    }
}
