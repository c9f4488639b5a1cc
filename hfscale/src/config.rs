//! Configuration management
//!
//! ```toml
//! [session]
//! timeout_ms = 2000
//!
//! [[devices]]
//! name = "dock"
//! host = "192.168.1.50"
//! port = 4001
//! description = "Loading dock platform scale"
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hfscale_core::constants::DEFAULT_TIMEOUT_MS;
use hfscale_types::DeviceRecord;

use crate::directory::StaticDirectory;
use crate::service::ScaleService;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaleConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

/// Per-command session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Response deadline in milliseconds, measured from the connection attempt (default: 2000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ScaleConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.timeout_ms == 0 {
            return Err(ConfigError::Validation("session.timeout_ms must be greater than 0".into()));
        }

        let mut names = HashSet::new();
        for device in &self.devices {
            if device.name.trim().is_empty() {
                return Err(ConfigError::Validation("device name must not be empty".into()));
            }
            if device.host.trim().is_empty() {
                return Err(ConfigError::Validation(format!("device {:?} has no host", device.name)));
            }
            if device.port == 0 {
                return Err(ConfigError::Validation(format!("device {:?} has port 0", device.name)));
            }
            if !names.insert(device.name.as_str()) {
                return Err(ConfigError::Validation(format!("duplicate device name {:?}", device.name)));
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.session.timeout_ms)
    }

    /// Directory over the configured devices.
    pub fn directory(&self) -> StaticDirectory {
        StaticDirectory::new(self.devices.clone())
    }

    /// Operation service over the configured devices.
    pub fn service(&self) -> ScaleService<StaticDirectory> {
        ScaleService::new(self.directory()).with_timeout(self.timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
        [session]
        timeout_ms = 1500

        [[devices]]
        name = "dock"
        host = "192.168.1.50"
        port = 4001
        description = "Loading dock"

        [[devices]]
        name = "lab"
        host = "192.168.1.51"
        port = 4001
        active = false
    "#;

    #[test]
    fn test_parse_sample() {
        let config = ScaleConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.timeout(), Duration::from_millis(1500));
        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.devices[0].description.as_deref(), Some("Loading dock"));
        assert!(!config.devices[1].active);
        assert_eq!(config.directory().find("192.168.1.50").map(|d| d.name.as_str()), Some("dock"));
    }

    #[test]
    fn test_defaults() {
        let config = ScaleConfig::from_toml_str("").unwrap();
        assert_eq!(config.session.timeout_ms, 2000);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let content = r#"
            [[devices]]
            name = "dock"
            host = "10.0.0.1"
            port = 4001

            [[devices]]
            name = "dock"
            host = "10.0.0.2"
            port = 4001
        "#;

        assert!(matches!(
            ScaleConfig::from_toml_str(content),
            Err(ConfigError::Validation(msg)) if msg.contains("duplicate")
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ScaleConfig::from_toml_str("[session]\ntimeout_ms = 0"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            ScaleConfig::from_toml_str("[[devices]]\nname = \"x\"\nhost = \"\"\nport = 1"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            ScaleConfig::from_toml_str("[[devices]]\nname = \"x\"\nhost = \"h\"\nport = 0"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            ScaleConfig::from_toml_str("[session]\ntimeout_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            ScaleConfig::load("/nonexistent/hfscale.toml"),
            Err(ConfigError::Read(_))
        ));
    }
}
