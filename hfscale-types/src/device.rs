//! Device addressing structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Network address of a scale
///
/// This is the only addressing input a session needs; it carries no
/// device identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaleAddress {
    /// Host name or IP address
    pub host: String,

    /// TCP port
    pub port: u16,
}

impl ScaleAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl FromStr for ScaleAddress {
    type Err = Error;

    /// Parse `host:port`
    fn from_str(s: &str) -> Result<Self> {
        let (host, port) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| Error::Parse(format!("expected host:port, got {s:?}")))?;

        let host = host.trim();
        if host.is_empty() {
            return Err(Error::Validation(format!("missing host in {s:?}")));
        }

        let port: u16 = port
            .trim()
            .parse()
            .map_err(|e| Error::Parse(format!("invalid port in {s:?}: {e}")))?;
        if port == 0 {
            return Err(Error::Validation(format!("port must be non-zero in {s:?}")));
        }

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for ScaleAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A scale as known to the device directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Unique, user-assigned name
    pub name: String,

    /// Host name or IP address
    pub host: String,

    /// TCP port
    pub port: u16,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Inactive devices are ignored by lookups
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl DeviceRecord {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            description: None,
            active: true,
        }
    }

    /// Address used to open a session with this device
    pub fn address(&self) -> ScaleAddress {
        ScaleAddress::new(self.host.trim(), self.port)
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scale[{} @ {}:{}]", self.name, self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_address() {
        let addr: ScaleAddress = " 192.168.1.50:4001 ".parse().unwrap();
        assert_eq!(addr, ScaleAddress::new("192.168.1.50", 4001));
        assert_eq!(addr.to_string(), "192.168.1.50:4001");
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!(matches!("scale".parse::<ScaleAddress>(), Err(Error::Parse(_))));
        assert!(matches!(":4001".parse::<ScaleAddress>(), Err(Error::Validation(_))));
        assert!(matches!("host:0".parse::<ScaleAddress>(), Err(Error::Validation(_))));
        assert!(matches!("host:70000".parse::<ScaleAddress>(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_record_defaults_active() {
        let record: DeviceRecord =
            serde_json::from_str(r#"{"name":"dock","host":"10.0.0.7 ","port":4001}"#).unwrap();

        assert!(record.active);
        assert_eq!(record.description, None);
        assert_eq!(record.address(), ScaleAddress::new("10.0.0.7", 4001));
    }
}
