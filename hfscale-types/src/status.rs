//! Scale status codes

use serde::{Deserialize, Serialize};

/// Status code reported by a status read, with its description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    pub code: u16,
    pub description: String,
}

impl StatusCode {
    pub fn new(code: u16) -> Self {
        Self {
            code,
            description: describe_status(code).to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0x00
    }
}

/// Human-readable description of a status code
///
/// Codes outside the documented table map to `"Unknown"`.
pub fn describe_status(code: u16) -> &'static str {
    match code {
        0x00 => "No error",
        0x01 => "Error reading configuration from flash",
        0x02 => "A/D converter failure",
        0x03 => "Load cell signal out of range",
        0x04 => "Load cell signal > 30mV",
        0x05 => "Load cell signal < -30mV",
        0x06 => "Load cell power supply failure",
        0x07 => "Overload (> Max + 9e)",
        0x08 => "Negative weight (< -19e)",
        0x40 => "Calibration or mode warning (firmware-specific)",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(describe_status(0x00), "No error");
        assert_eq!(describe_status(0x07), "Overload (> Max + 9e)");
        assert_eq!(describe_status(0x40), "Calibration or mode warning (firmware-specific)");
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(describe_status(0x20), "Unknown");
        assert_eq!(StatusCode::new(0x09).description, "Unknown");
    }

    #[test]
    fn test_is_ok() {
        assert!(StatusCode::new(0).is_ok());
        assert!(!StatusCode::new(0x07).is_ok());
    }
}
