//! Session outcomes
//!
//! One [`Outcome`] is produced per scale operation. Its JSON form is a flat
//! object discriminated by `type`:
//!
//! ```text
//! {"type":"weight","unit":"kg","gross":"W    12.340","tare":"T    00.000",
//!  "flags":"S004","lrc":"5A","lrcValid":true,"weight":12.34,"statusFlags":{..}}
//! {"type":"tare","message":"tare executed successfully","lrc":"..","lrcValid":true,"success":true}
//! {"type":"error","error":"No response from scale, raw: none"}
//! ```
//!
//! Field names and `type` values are a compatibility contract.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::flags::StatusFlags;
use crate::status::StatusCode;

/// Result of one scale operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outcome {
    Weight(WeightReading),
    Status(StatusReport),
    Tare(CommandResult),
    PresetTare(CommandResult),
    ClearPreset(CommandResult),
    Error(Failure),
}

/// Decoded weight response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightReading {
    /// Always `"kg"`
    pub unit: String,

    /// Raw gross field, including its type letter
    pub gross: String,

    /// Raw tare field, including its type letter
    pub tare: String,

    /// Raw 4-character flags field
    pub flags: String,

    /// Checksum as declared by the scale
    pub lrc: String,
    pub lrc_valid: bool,

    /// Net weight (gross - tare); `None` when either field is not numeric
    pub weight: Option<f64>,

    pub status_flags: StatusFlags,
}

/// Decoded status response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status: StatusCode,
    pub lrc: String,
    pub lrc_valid: bool,
}

/// Decoded reply to a tare, preset-tare or clear-preset command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub message: String,
    pub lrc: String,
    pub lrc_valid: bool,
    pub success: bool,
}

/// Any failure: transport, timeout, out-of-range input or an unrecognized reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub error: String,

    /// Lowercase hex of the bytes received, when they are useful for diagnosis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl Outcome {
    /// Build an error outcome
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(Failure {
            error: message.into(),
            raw_response: None,
        })
    }

    /// Build an error outcome that carries the received bytes as hex
    pub fn error_with_raw(message: impl Into<String>, raw_hex: impl Into<String>) -> Self {
        Self::Error(Failure {
            error: message.into(),
            raw_response: Some(raw_hex.into()),
        })
    }

    /// The `type` discriminator as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Weight(_) => "weight",
            Self::Status(_) => "status",
            Self::Tare(_) => "tare",
            Self::PresetTare(_) => "presetTare",
            Self::ClearPreset(_) => "clearPreset",
            Self::Error(_) => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Device-reported success for command replies; `None` for reads and errors
    pub fn success(&self) -> Option<bool> {
        match self {
            Self::Tare(r) | Self::PresetTare(r) | Self::ClearPreset(r) => Some(r.success),
            _ => None,
        }
    }

    /// Checksum validity of the decoded frame; `None` for errors
    pub fn lrc_valid(&self) -> Option<bool> {
        match self {
            Self::Weight(w) => Some(w.lrc_valid),
            Self::Status(s) => Some(s.lrc_valid),
            Self::Tare(r) | Self::PresetTare(r) | Self::ClearPreset(r) => Some(r.lrc_valid),
            Self::Error(_) => None,
        }
    }

    /// Error message, if this is an error outcome
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(f) => Some(&f.error),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weight(w) => match w.weight {
                Some(net) => write!(f, "weight: {net} {}", w.unit),
                None => write!(f, "weight: unreadable (gross={:?}, tare={:?})", w.gross, w.tare),
            },
            Self::Status(s) => write!(f, "status: 0x{:02X} {}", s.status.code, s.status.description),
            Self::Tare(r) | Self::PresetTare(r) | Self::ClearPreset(r) => {
                write!(f, "{}: {}", self.kind(), r.message)
            }
            Self::Error(e) => write!(f, "error: {}", e.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn result(success: bool) -> CommandResult {
        CommandResult {
            message: "tare executed successfully".into(),
            lrc: "7A".into(),
            lrc_valid: true,
            success,
        }
    }

    #[test]
    fn test_type_tags() {
        let cases = [
            (Outcome::Tare(result(true)), "tare"),
            (Outcome::PresetTare(result(true)), "presetTare"),
            (Outcome::ClearPreset(result(true)), "clearPreset"),
            (Outcome::error("boom"), "error"),
        ];

        for (outcome, tag) in cases {
            let json = serde_json::to_value(&outcome).unwrap();
            assert_eq!(json["type"], tag);
            assert_eq!(outcome.kind(), tag);
        }
    }

    #[test]
    fn test_command_result_shape() {
        let json = serde_json::to_value(Outcome::Tare(result(false))).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "tare",
                "message": "tare executed successfully",
                "lrc": "7A",
                "lrcValid": true,
                "success": false,
            })
        );
    }

    #[test]
    fn test_error_shape() {
        let plain = serde_json::to_value(Outcome::error("Device with specified IP not found")).unwrap();
        assert_eq!(plain, json!({"type": "error", "error": "Device with specified IP not found"}));

        let raw = serde_json::to_value(Outcome::error_with_raw("Invalid or unrecognized response", "0230")).unwrap();
        assert_eq!(raw["rawResponse"], "0230");
    }

    #[test]
    fn test_weight_null_when_unreadable() {
        let outcome = Outcome::Weight(WeightReading {
            unit: "kg".into(),
            gross: "W    --.---".into(),
            tare: "T    00.000".into(),
            flags: "S000".into(),
            lrc: "00".into(),
            lrc_valid: false,
            weight: None,
            status_flags: StatusFlags::empty(),
        });

        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json["weight"].is_null());
        assert_eq!(json["lrcValid"], false);
        assert_eq!(json["statusFlags"]["tareMode"], "normal");

        let back: Outcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Outcome::Tare(result(true)).success(), Some(true));
        assert_eq!(Outcome::error("x").success(), None);
        assert_eq!(Outcome::error("x").lrc_valid(), None);
        assert_eq!(Outcome::error("x").error_message(), Some("x"));
        assert!(Outcome::error("x").is_error());
    }
}
