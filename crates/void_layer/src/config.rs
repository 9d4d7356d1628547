//! Layer configuration
//!
//! Plain-data layer settings, loadable from JSON. Collaborators (camera,
//! viewport, partition, frame buffer) are attached in code, not here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{LayerError, Result};
use crate::partition::{SortMode, SortScale};

/// Layer settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub sort_mode: SortMode,
    pub sort_scale: SortScale,
    /// Cull against the view volume's XY footprint instead of the frustum
    pub partition_cull_2d: bool,
    pub show_debug_lines: bool,
    /// Stored only; not applied when drawing
    pub parallax: Vec2,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::PriorityAscending,
            sort_scale: SortScale::default(),
            partition_cull_2d: false,
            show_debug_lines: true,
            parallax: Vec2::ONE,
        }
    }
}

impl LayerConfig {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sort_scale.is_finite() {
            return Err(LayerError::InvalidConfig(format!(
                "sort_scale must be finite, got {:?}",
                self.sort_scale.to_array()
            )));
        }
        if !self.parallax.is_finite() {
            return Err(LayerError::InvalidConfig(format!(
                "parallax must be finite, got {:?}",
                self.parallax
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayerConfig::default();
        assert_eq!(config.sort_mode, SortMode::PriorityAscending);
        assert_eq!(config.sort_scale.to_array(), [0.0, 0.0, 0.0, 1.0]);
        assert!(!config.partition_cull_2d);
        assert!(config.show_debug_lines);
        assert_eq!(config.parallax, Vec2::ONE);
    }

    #[test]
    fn test_json_round_trip() {
        let config = LayerConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(LayerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = LayerConfig::from_json(r#"{ "sort_mode": "y_descending", "partition_cull_2d": true }"#).unwrap();
        assert_eq!(config.sort_mode, SortMode::YDescending);
        assert!(config.partition_cull_2d);
        assert!(config.show_debug_lines);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            LayerConfig::from_json(r#"{ "sort_mode": "sideways" }"#),
            Err(LayerError::Serialization(_))
        ));

        let mut config = LayerConfig::default();
        config.parallax = Vec2::new(f32::NAN, 1.0);
        assert!(matches!(config.validate(), Err(LayerError::InvalidConfig(_))));
    }
}
