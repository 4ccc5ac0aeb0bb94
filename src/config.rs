use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// World-level tuning. Every field has a default, so partial YAML files work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Hard cap on live entities
    pub max_entities: usize,

    /// Speed bound the integrator clamps to [m/s]
    pub max_linear_velocity: f64,

    /// Angular rate bound the integrator clamps to [rad/s]
    pub max_angular_velocity: f64,

    /// Rate the drag retentions are specified at, and the default frequency
    /// for the per-frame systems [Hz]
    pub reference_rate_hz: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_entities: 4096,
            max_linear_velocity: 1.0e4,
            max_angular_velocity: 1.0e2,
            reference_rate_hz: 60.0,
        }
    }
}

impl SimConfig {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entities == 0 {
            return Err(ConfigError::Invalid("max_entities must be nonzero".into()));
        }
        if !self.max_linear_velocity.is_finite() || self.max_linear_velocity <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_linear_velocity must be finite and positive, got {}",
                self.max_linear_velocity
            )));
        }
        if !self.max_angular_velocity.is_finite() || self.max_angular_velocity <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_angular_velocity must be finite and positive, got {}",
                self.max_angular_velocity
            )));
        }
        if !self.reference_rate_hz.is_finite() || self.reference_rate_hz <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "reference_rate_hz must be finite and positive, got {}",
                self.reference_rate_hz
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_yaml_takes_defaults() {
        let config = SimConfig::from_yaml("max_entities: 128\n").unwrap();
        assert_eq!(config.max_entities, 128);
        assert_eq!(config.max_linear_velocity, 1.0e4);
        assert_eq!(config.reference_rate_hz, 60.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(SimConfig::from_yaml("max_entities: 0\n").is_err());
        assert!(SimConfig::from_yaml("max_linear_velocity: -1.0\n").is_err());
    }

    #[test]
    fn test_round_trip() {
        let config = SimConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = SimConfig::from_yaml(&yaml).unwrap();
        assert_eq!(config.max_entities, parsed.max_entities);
    }
}
