//! Engine configuration: defaults, validation, JSON persistence

use crate::core::{GeoPoint, LATITUDE_MAX, LATITUDE_MIN, LONGITUDE_MAX, LONGITUDE_MIN};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Engine-wide configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Venue fallback center when no vehicle is being followed
    pub default_center: GeoPoint,
    /// Zoom level for the venue fallback viewport
    pub default_zoom: f64,
    /// How many times a new alert is announced before the job completes
    pub announcement_repeats: u32,
    /// Bound on retained path samples per vehicle (ring of most recent N)
    pub max_path_samples: usize,
    /// Fixed mounting-angle offset added to estimated headings (degrees).
    /// Zero unless the deployment actually needs one.
    pub bearing_offset_deg: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Silverstone circuit
            default_center: GeoPoint::new(52.0713481, -1.0158036),
            default_zoom: 15.0,
            announcement_repeats: 1,
            max_path_samples: 512,
            bearing_offset_deg: 0.0,
        }
    }
}

/// Configuration validation and persistence errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    IoError {
        message: String,
    },
    SerializationError {
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidParameter {
                parameter,
                value,
                reason,
            } => write!(f, "Invalid parameter '{}' = '{}': {}", parameter, value, reason),
            ConfigError::IoError { message } => write!(f, "I/O error: {}", message),
            ConfigError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    /// Validate every parameter, first failure wins
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(LATITUDE_MIN..=LATITUDE_MAX).contains(&self.default_center.lat) {
            return Err(ConfigError::InvalidParameter {
                parameter: "default_center.lat".to_string(),
                value: self.default_center.lat.to_string(),
                reason: "Latitude must be between -90 and 90 degrees".to_string(),
            });
        }
        if !(LONGITUDE_MIN..=LONGITUDE_MAX).contains(&self.default_center.lng) {
            return Err(ConfigError::InvalidParameter {
                parameter: "default_center.lng".to_string(),
                value: self.default_center.lng.to_string(),
                reason: "Longitude must be between -180 and 180 degrees".to_string(),
            });
        }
        if !self.default_zoom.is_finite() || self.default_zoom <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "default_zoom".to_string(),
                value: self.default_zoom.to_string(),
                reason: "Zoom must be a positive number".to_string(),
            });
        }
        if self.announcement_repeats == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "announcement_repeats".to_string(),
                value: self.announcement_repeats.to_string(),
                reason: "At least one announcement per new alert is required".to_string(),
            });
        }
        if self.max_path_samples < 2 {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_path_samples".to_string(),
                value: self.max_path_samples.to_string(),
                reason: "Path retention below 2 samples breaks heading estimation".to_string(),
            });
        }
        if !self.bearing_offset_deg.is_finite() {
            return Err(ConfigError::InvalidParameter {
                parameter: "bearing_offset_deg".to_string(),
                value: self.bearing_offset_deg.to_string(),
                reason: "Bearing offset must be finite".to_string(),
            });
        }
        Ok(())
    }

    /// Load and validate configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.announcement_repeats, 1);
        assert_eq!(config.max_path_samples, 512);
        assert_eq!(config.bearing_offset_deg, 0.0);
    }

    #[test]
    fn test_invalid_center_rejected() {
        let config = EngineConfig {
            default_center: GeoPoint::new(91.0, 0.0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { parameter, .. }) if parameter == "default_center.lat"
        ));
    }

    #[test]
    fn test_zero_repeats_rejected() {
        let config = EngineConfig {
            announcement_repeats: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tiny_path_retention_rejected() {
        let config = EngineConfig {
            max_path_samples: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let config = EngineConfig {
            announcement_repeats: 2,
            default_zoom: 12.0,
            ..Default::default()
        };

        let temp_path = PathBuf::from("test_engine_config.json");
        config.save_to_file(&temp_path).unwrap();
        let loaded = EngineConfig::from_file(&temp_path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_file(temp_path);
    }
}
