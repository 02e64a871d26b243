//! Session configuration
//!
//! Serializable settings for a detection session, loadable from TOML. The
//! same validation the property setters apply runs before a configuration
//! touches a session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{ColorExclusionRule, DEFAULT_ALPHA_RANGE, DEFAULT_CHANNEL_RANGE};
use crate::error::CollisionError;

/// One exclusion-rule entry in a configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExclusionEntry {
    /// Target color, `0xAARRGGBB`
    pub color: u32,
    /// Alpha tolerance
    #[serde(default = "default_alpha_range")]
    pub alpha_range: u8,
    /// Red tolerance
    #[serde(default = "default_channel_range")]
    pub red_range: u8,
    /// Green tolerance
    #[serde(default = "default_channel_range")]
    pub green_range: u8,
    /// Blue tolerance
    #[serde(default = "default_channel_range")]
    pub blue_range: u8,
}

fn default_alpha_range() -> u8 {
    DEFAULT_ALPHA_RANGE
}

fn default_channel_range() -> u8 {
    DEFAULT_CHANNEL_RANGE
}

impl From<ExclusionEntry> for ColorExclusionRule {
    fn from(entry: ExclusionEntry) -> Self {
        ColorExclusionRule::new(
            entry.color,
            entry.alpha_range,
            entry.red_range,
            entry.green_range,
            entry.blue_range,
        )
    }
}

/// Detection session settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum opacity (0-1) a pixel needs on both sides to collide
    pub alpha_threshold: f32,
    /// Attach a contact angle to each collision
    pub calculate_angles: bool,
    /// Attach the overlapping-point list to each collision
    pub calculate_overlap: bool,
    /// Skip objects without a containing stage
    pub ignore_parentless: bool,
    /// Skip invisible objects
    pub ignore_invisibles: bool,
    /// Ticks skipped between detection cycles
    pub skip: u32,
    /// Colors masked out of collision tests
    pub exclusions: Vec<ExclusionEntry>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 0.0,
            calculate_angles: false,
            calculate_overlap: false,
            ignore_parentless: false,
            ignore_invisibles: false,
            skip: 0,
            exclusions: Vec::new(),
        }
    }
}

/// Configuration load and apply errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML parse failure
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization failure
    #[error("serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A setting failed session validation
    #[error(transparent)]
    Invalid(#[from] CollisionError),

    /// IO error reading a configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DetectorConfig {
    /// Check every setting against the session's validation rules
    pub fn validate(&self) -> Result<(), CollisionError> {
        if !(0.0..=1.0).contains(&self.alpha_threshold) {
            return Err(CollisionError::AlphaThresholdOutOfRange(
                self.alpha_threshold,
            ));
        }
        Ok(())
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        log::debug!("loaded detector configuration from {path}");
        Self::from_toml_str(&contents)
    }

    /// Render this configuration as TOML text
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetectorConfig::default();
        assert_eq!(config.alpha_threshold, 0.0);
        assert!(!config.calculate_angles);
        assert_eq!(config.skip, 0);
        assert!(config.exclusions.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DetectorConfig {
            alpha_threshold: 0.5,
            calculate_angles: true,
            skip: 3,
            exclusions: vec![ExclusionEntry {
                color: 0xFF00_FF00,
                alpha_range: 255,
                red_range: 20,
                green_range: 20,
                blue_range: 20,
            }],
            ..DetectorConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        let parsed = DetectorConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = DetectorConfig::from_toml_str(
            "alpha_threshold = 0.25\n\n[[exclusions]]\ncolor = 16711680\n",
        )
        .unwrap();
        assert_eq!(parsed.alpha_threshold, 0.25);
        assert!(!parsed.calculate_overlap);
        assert_eq!(parsed.exclusions[0].alpha_range, DEFAULT_ALPHA_RANGE);
        assert_eq!(parsed.exclusions[0].red_range, DEFAULT_CHANNEL_RANGE);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = DetectorConfig::from_toml_str("alpha_threshold = 1.5");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(
                CollisionError::AlphaThresholdOutOfRange(_)
            ))
        ));
    }
}
