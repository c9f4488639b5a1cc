//! Device operations by directory key
//!
//! This is the surface an HTTP layer calls: resolve the device, run one
//! operation, hand back the [`Outcome`] as the response payload.

use std::time::Duration;

use tracing::info;

use hfscale_core::Command;
use hfscale_types::Outcome;

use crate::device::{DEFAULT_TIMEOUT, Scale};
use crate::directory::DeviceDirectory;
use crate::error::{Error, Result};

/// Scale operations addressed through a [`DeviceDirectory`]
#[derive(Debug, Clone)]
pub struct ScaleService<D> {
    directory: D,
    timeout: Duration,
}

impl<D: DeviceDirectory> ScaleService<D> {
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-operation response deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub async fn weight(&self, key: &str) -> Outcome {
        self.run(key, Command::ReadWeight).await
    }

    /// Execute a tare (followed by a preset clear when it succeeds)
    pub async fn tare(&self, key: &str) -> Outcome {
        self.run(key, Command::ExecuteTare).await
    }

    pub async fn status(&self, key: &str) -> Outcome {
        self.run(key, Command::ReadStatus).await
    }

    pub async fn clear_preset(&self, key: &str) -> Outcome {
        self.run(key, Command::ClearPresetTare).await
    }

    /// Set a preset tare from a textual kilogram value
    pub async fn preset_tare(&self, key: &str, value_kg: Option<&str>) -> Outcome {
        let scale = match self.resolve(key).await {
            Ok(scale) => scale,
            Err(e) => return e.to_outcome(),
        };

        let command = value_kg
            .filter(|value| !value.trim().is_empty())
            .ok_or(Error::MissingValue)
            .and_then(|value| Command::preset_tare_from_str(value).map_err(Error::from));

        match command {
            Ok(command) => scale.execute(command).await,
            Err(e) => e.to_outcome(),
        }
    }

    async fn run(&self, key: &str, command: Command) -> Outcome {
        match self.resolve(key).await {
            Ok(scale) => scale.execute(command).await,
            Err(e) => e.to_outcome(),
        }
    }

    async fn resolve(&self, key: &str) -> Result<Scale> {
        let key = key.trim();
        info!("Processing request for {}", key);

        self.directory
            .lookup(key)
            .await?
            .map(|address| Scale::from_address(address).with_timeout(self.timeout))
            .ok_or_else(|| Error::DeviceNotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StaticDirectory;
    use async_trait::async_trait;
    use hfscale_types::{DeviceRecord, ScaleAddress};

    fn service() -> ScaleService<StaticDirectory> {
        // 192.0.2.0/24 is reserved for documentation; these tests never connect
        ScaleService::new(StaticDirectory::new(vec![DeviceRecord::new("dock", "192.0.2.1", 4001)]))
    }

    #[tokio::test]
    async fn test_unknown_device() {
        let outcome = service().weight("192.0.2.99").await;
        assert_eq!(outcome.error_message(), Some("Device with specified IP not found"));

        let outcome = service().preset_tare("192.0.2.99", Some("1.0")).await;
        assert_eq!(outcome.error_message(), Some("Device with specified IP not found"));
    }

    #[tokio::test]
    async fn test_preset_tare_requires_value() {
        let outcome = service().preset_tare("192.0.2.1", None).await;
        assert_eq!(outcome.error_message(), Some("Value query parameter required"));

        let outcome = service().preset_tare("192.0.2.1", Some("  ")).await;
        assert_eq!(outcome.error_message(), Some("Value query parameter required"));
    }

    #[tokio::test]
    async fn test_preset_tare_rejects_bad_values() {
        for value in ["abc", "30.5", "-2"] {
            let outcome = service().preset_tare("dock", Some(value)).await;
            assert_eq!(
                outcome.error_message(),
                Some("Value must be between 0.0 and 30.0 kg"),
                "value {value}"
            );
        }
    }

    struct BrokenDirectory;

    #[async_trait]
    impl DeviceDirectory for BrokenDirectory {
        async fn lookup(&self, _key: &str) -> Result<Option<ScaleAddress>> {
            Err(Error::Directory("database unavailable".into()))
        }
    }

    #[tokio::test]
    async fn test_directory_failure() {
        let outcome = ScaleService::new(BrokenDirectory).status("dock").await;
        assert_eq!(
            outcome.error_message(),
            Some("Device directory error: database unavailable")
        );
    }
}
