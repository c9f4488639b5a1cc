//! Device directory
//!
//! The directory owns device records; sessions only ever see the resolved
//! [`ScaleAddress`].

use async_trait::async_trait;
use tracing::debug;

use hfscale_types::{DeviceRecord, ScaleAddress};

use crate::error::Result;

/// Resolves a device key to a network address
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    /// Look up a device by IP/host or name
    ///
    /// Returns `Ok(None)` when no active device matches.
    async fn lookup(&self, key: &str) -> Result<Option<ScaleAddress>>;
}

/// In-memory directory, typically built from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    devices: Vec<DeviceRecord>,
}

impl StaticDirectory {
    pub fn new(devices: Vec<DeviceRecord>) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    /// Find an active device whose host (ignoring surrounding whitespace) or
    /// name equals `key`
    pub fn find(&self, key: &str) -> Option<&DeviceRecord> {
        let key = key.trim();

        self.devices
            .iter()
            .filter(|device| device.active)
            .find(|device| device.host.trim() == key || device.name == key)
    }
}

#[async_trait]
impl DeviceDirectory for StaticDirectory {
    async fn lookup(&self, key: &str) -> Result<Option<ScaleAddress>> {
        let found = self.find(key);

        match found {
            Some(device) => debug!("Resolved {:?} to {}", key, device),
            None => debug!("No active device for {:?}", key),
        }

        Ok(found.map(DeviceRecord::address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn directory() -> StaticDirectory {
        let mut retired = DeviceRecord::new("retired", "10.0.0.9", 4001);
        retired.active = false;

        StaticDirectory::new(vec![
            DeviceRecord::new("dock", " 10.0.0.7", 4001),
            DeviceRecord::new("lab", "10.0.0.8", 4002),
            retired,
        ])
    }

    #[tokio::test]
    async fn test_lookup_by_host_trims() {
        let address = directory().lookup(" 10.0.0.7 ").await.unwrap();
        assert_eq!(address, Some(ScaleAddress::new("10.0.0.7", 4001)));
    }

    #[tokio::test]
    async fn test_lookup_by_name() {
        let address = directory().lookup("lab").await.unwrap();
        assert_eq!(address, Some(ScaleAddress::new("10.0.0.8", 4002)));
    }

    #[tokio::test]
    async fn test_lookup_skips_inactive() {
        assert_eq!(directory().lookup("10.0.0.9").await.unwrap(), None);
        assert_eq!(directory().lookup("unknown").await.unwrap(), None);
    }
}
