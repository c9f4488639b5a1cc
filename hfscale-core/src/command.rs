//! Scale command definitions and frame encoding

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::constants::{
    CLEAR_PRESET_DIGITS, COMMAND_CLASS, CRLF, DEVICE_ADDRESS, ETX, PLAIN_DATA_DIGITS,
    PRESET_TARE_DIGITS, PRESET_TARE_MAX_GRAMS, STX, offsets,
};
use crate::error::{Error, Result};

/// Function code of a frame
///
/// Requests use the uppercase letter, replies echo it in lowercase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    Read,
    Write,
    Execute,
}

impl Function {
    /// Byte sent in a command frame
    pub fn request_code(self) -> u8 {
        match self {
            Self::Read => b'R',
            Self::Write => b'W',
            Self::Execute => b'E',
        }
    }

    /// Byte the scale answers with
    pub fn response_code(self) -> u8 {
        self.request_code().to_ascii_lowercase()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Execute => "execute",
        }
    }

    /// Accepts both request and response codes
    pub fn from_code(code: u8) -> Result<Self> {
        match code.to_ascii_uppercase() {
            b'R' => Ok(Self::Read),
            b'W' => Ok(Self::Write),
            b'E' => Ok(Self::Execute),
            _ => Err(Error::UnknownFunction(code)),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Register addresses (part of the wire contract)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Register {
    Weight = 0x0107,
    Status = 0x0100,
    Tare = 0x1103,
    PresetTare = 0x0808,
}

impl Register {
    /// 4-character ASCII form used on the wire
    pub fn code(self) -> &'static str {
        match self {
            Self::Weight => "0107",
            Self::Status => "0100",
            Self::Tare => "1103",
            Self::PresetTare => "0808",
        }
    }

    /// Check whether a 4-byte register field names this register
    pub fn matches(self, field: &[u8]) -> bool {
        field == self.code().as_bytes()
    }
}

impl From<Register> for u16 {
    fn from(register: Register) -> u16 {
        register as u16
    }
}

impl TryFrom<&[u8]> for Register {
    type Error = Error;

    fn try_from(field: &[u8]) -> Result<Self> {
        [Self::Weight, Self::Status, Self::Tare, Self::PresetTare]
            .into_iter()
            .find(|register| register.matches(field))
            .ok_or_else(|| Error::UnknownRegister(String::from_utf8_lossy(field).into_owned()))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Commands understood by the scale
///
/// # Frame Structure
///
/// ```text
/// ┌─────┬──────┬──────┬──────┬──────────┬────────────┬─────┬───────────┐
/// │ STX │ "00" │ "FF" │ func │ register │    data    │ ETX │ CR LF     │
/// │ 02  │  2   │  2   │  1   │    4     │ 4, 8 or 10 │ 03  │ 0D 0A     │
/// └─────┴──────┴──────┴──────┴──────────┴────────────┴─────┴───────────┘
/// ```
///
/// Commands carry no checksum.
///
/// # Examples
///
/// ```
/// use hfscale_core::Command;
///
/// let frame = Command::ReadWeight.encode();
/// assert_eq!(&frame[..], b"\x0200FFR01070000\x03\r\n");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    ReadWeight,
    ExecuteTare,
    ReadStatus,
    ClearPresetTare,
    /// Store a preset tare; build it with [`Command::preset_tare`] so the
    /// value is range-checked
    PresetTare {
        grams: u32,
    },
}

impl Command {
    /// Preset tare from a value in kilograms
    ///
    /// The value is rounded to the nearest gram.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] if the value is negative, not finite, or above
    /// 30.0 kg.
    ///
    /// # Examples
    ///
    /// ```
    /// use hfscale_core::Command;
    ///
    /// let cmd = Command::preset_tare(1.0).unwrap();
    /// assert_eq!(cmd, Command::PresetTare { grams: 1000 });
    /// assert!(Command::preset_tare(30.5).is_err());
    /// ```
    pub fn preset_tare(value_kg: f64) -> Result<Self> {
        let out_of_range = || Error::OutOfRange {
            value: value_kg.to_string(),
        };

        if !value_kg.is_finite() || value_kg < 0.0 {
            return Err(out_of_range());
        }

        let grams = (value_kg * 1000.0).round();
        if grams > f64::from(PRESET_TARE_MAX_GRAMS) {
            return Err(out_of_range());
        }

        Ok(Self::PresetTare {
            grams: grams as u32,
        })
    }

    /// Preset tare from a decimal kilogram string, e.g. a query parameter
    pub fn preset_tare_from_str(value_kg: &str) -> Result<Self> {
        let value: f64 = value_kg.trim().parse().map_err(|_| Error::OutOfRange {
            value: value_kg.to_string(),
        })?;

        Self::preset_tare(value).map_err(|_| Error::OutOfRange {
            value: value_kg.to_string(),
        })
    }

    pub fn function(self) -> Function {
        match self {
            Self::ReadWeight | Self::ReadStatus => Function::Read,
            Self::ExecuteTare => Function::Execute,
            Self::ClearPresetTare | Self::PresetTare { .. } => Function::Write,
        }
    }

    pub fn register(self) -> Register {
        match self {
            Self::ReadWeight => Register::Weight,
            Self::ReadStatus => Register::Status,
            Self::ExecuteTare => Register::Tare,
            Self::ClearPresetTare | Self::PresetTare { .. } => Register::PresetTare,
        }
    }

    /// ASCII data field
    fn data_field(self) -> String {
        match self {
            Self::ReadWeight | Self::ReadStatus | Self::ExecuteTare => "0".repeat(PLAIN_DATA_DIGITS),
            Self::ClearPresetTare => "0".repeat(CLEAR_PRESET_DIGITS),
            Self::PresetTare { grams } => format!("{grams:0width$}", width = PRESET_TARE_DIGITS),
        }
    }

    /// Encode to a complete frame
    pub fn encode(self) -> Bytes {
        let data = self.data_field();
        let mut buf = BytesMut::with_capacity(offsets::LENGTH.start + data.len() + 3);

        buf.put_u8(STX);
        buf.put_slice(DEVICE_ADDRESS);
        buf.put_slice(COMMAND_CLASS);
        buf.put_u8(self.function().request_code());
        buf.put_slice(self.register().code().as_bytes());
        buf.put_slice(data.as_bytes());
        buf.put_u8(ETX);
        buf.put_slice(&CRLF);

        buf.freeze()
    }

    /// Check whether `frame` is exactly this command's encoding
    pub fn matches(self, frame: &[u8]) -> bool {
        frame == self.encode().as_ref()
    }

    /// Recover the command a frame encodes, if any
    ///
    /// The frame must be byte-for-byte what [`Command::encode`] would produce.
    pub fn identify(frame: &[u8]) -> Option<Self> {
        if frame.len() <= offsets::LENGTH.start || frame[0] != STX {
            return None;
        }

        let function = Function::from_code(frame[offsets::FUNCTION]).ok()?;
        let register = Register::try_from(&frame[offsets::REGISTER]).ok()?;

        let data_end = frame.iter().position(|&b| b == ETX)?;
        let data = frame.get(offsets::LENGTH.start..data_end)?;

        let command = match (function, register) {
            (Function::Read, Register::Weight) => Self::ReadWeight,
            (Function::Read, Register::Status) => Self::ReadStatus,
            (Function::Execute, Register::Tare) => Self::ExecuteTare,
            (Function::Write, Register::PresetTare) if data.len() == CLEAR_PRESET_DIGITS => {
                Self::ClearPresetTare
            }
            (Function::Write, Register::PresetTare) => Self::PresetTare {
                grams: std::str::from_utf8(data).ok()?.parse().ok()?,
            },
            _ => return None,
        };

        command.matches(frame).then_some(command)
    }

    /// Check whether `frame` writes the preset tare register
    ///
    /// Covers both setting and clearing.
    pub fn is_preset_tare_write(frame: &[u8]) -> bool {
        frame.len() > offsets::LENGTH.end
            && frame[offsets::FUNCTION] == Function::Write.request_code()
            && Register::PresetTare.matches(&frame[offsets::REGISTER])
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::ReadWeight => "READ_WEIGHT",
            Self::ExecuteTare => "EXECUTE_TARE",
            Self::ReadStatus => "READ_STATUS",
            Self::ClearPresetTare => "CLEAR_PRESET_TARE",
            Self::PresetTare { .. } => "PRESET_TARE",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PresetTare { grams } => write!(f, "{}({} g)", self.name(), grams),
            _ => write!(f, "{}({} {})", self.name(), self.function(), self.register()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_frames() {
        assert_eq!(
            Command::ReadWeight.encode().as_ref(),
            &[0x02, 0x30, 0x30, 0x46, 0x46, 0x52, 0x30, 0x31, 0x30, 0x37, 0x30, 0x30, 0x30, 0x30, 0x03, 0x0D, 0x0A]
        );
        assert_eq!(
            Command::ExecuteTare.encode().as_ref(),
            &[0x02, 0x30, 0x30, 0x46, 0x46, 0x45, 0x31, 0x31, 0x30, 0x33, 0x30, 0x30, 0x30, 0x30, 0x03, 0x0D, 0x0A]
        );
        assert_eq!(
            Command::ReadStatus.encode().as_ref(),
            &[0x02, 0x30, 0x30, 0x46, 0x46, 0x52, 0x30, 0x31, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x03, 0x0D, 0x0A]
        );
        assert_eq!(
            Command::ClearPresetTare.encode().as_ref(),
            b"\x0200FFW08080000000000\x03\r\n"
        );
    }

    #[test]
    fn test_preset_tare_frame() {
        let frame = Command::preset_tare(1.0).unwrap().encode();
        assert_eq!(frame.as_ref(), b"\x0200FFW080800001000\x03\r\n");
    }

    #[test]
    fn test_preset_tare_rounds_to_gram() {
        assert_eq!(Command::preset_tare(1.2345).unwrap(), Command::PresetTare { grams: 1235 });
        assert_eq!(Command::preset_tare(0.0004).unwrap(), Command::PresetTare { grams: 0 });
        assert_eq!(Command::preset_tare(30.0).unwrap(), Command::PresetTare { grams: 30_000 });
        assert_eq!(Command::preset_tare(30.0004).unwrap(), Command::PresetTare { grams: 30_000 });
    }

    #[test]
    fn test_preset_tare_out_of_range() {
        for value in [-0.001, 30.001, 100.0, f64::NAN, f64::INFINITY] {
            let err = Command::preset_tare(value).unwrap_err();
            assert!(matches!(err, Error::OutOfRange { .. }), "{value} accepted");
            assert_eq!(err.to_string(), "Value must be between 0.0 and 30.0 kg");
        }
    }

    #[test]
    fn test_preset_tare_from_str() {
        assert_eq!(
            Command::preset_tare_from_str(" 2.5 ").unwrap(),
            Command::PresetTare { grams: 2500 }
        );

        let err = Command::preset_tare_from_str("heavy").unwrap_err();
        assert!(matches!(err, Error::OutOfRange { ref value } if value == "heavy"));
        assert!(Command::preset_tare_from_str("31").is_err());
        assert!(Command::preset_tare_from_str("").is_err());
    }

    #[test]
    fn test_identify() {
        for cmd in [
            Command::ReadWeight,
            Command::ExecuteTare,
            Command::ReadStatus,
            Command::ClearPresetTare,
            Command::PresetTare { grams: 12_345 },
        ] {
            assert_eq!(Command::identify(&cmd.encode()), Some(cmd));
        }

        assert_eq!(Command::identify(b"\x0200FFR01080000\x03\r\n"), None);
        assert_eq!(Command::identify(b"garbage"), None);
        assert_eq!(Command::identify(b""), None);
    }

    #[test]
    fn test_is_preset_tare_write() {
        assert!(Command::is_preset_tare_write(&Command::ClearPresetTare.encode()));
        assert!(Command::is_preset_tare_write(&Command::PresetTare { grams: 5 }.encode()));
        assert!(!Command::is_preset_tare_write(&Command::ExecuteTare.encode()));
        assert!(!Command::is_preset_tare_write(b"\x0200FFW08"));
    }

    #[test]
    fn test_function_codes() {
        assert_eq!(Function::Read.response_code(), b'r');
        assert_eq!(Function::from_code(b'e').unwrap(), Function::Execute);
        assert!(matches!(Function::from_code(b'x'), Err(Error::UnknownFunction(b'x'))));
    }

    #[test]
    fn test_register_conversion() {
        assert_eq!(u16::from(Register::Tare), 0x1103);
        assert_eq!(Register::try_from(&b"0100"[..]).unwrap(), Register::Status);
        assert!(Register::try_from(&b"9999"[..]).is_err());
    }

    proptest! {
        #[test]
        fn prop_preset_tare_digits_round_trip(grams in 0u32..=30_000) {
            let cmd = Command::preset_tare(f64::from(grams) / 1000.0).unwrap();
            let frame = cmd.encode();

            let digits = std::str::from_utf8(&frame[10..18]).unwrap();
            prop_assert_eq!(digits, format!("{grams:08}"));
            prop_assert_eq!(frame[18], ETX);
        }

        #[test]
        fn prop_preset_tare_above_limit_rejected(grams in 30_001u32..10_000_000) {
            prop_assert!(Command::preset_tare(f64::from(grams) / 1000.0).is_err());
        }
    }
}
