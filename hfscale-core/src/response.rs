//! Response classification and decoding
//!
//! Replies carry no type tag. The type is inferred from the frame's length,
//! its function and register fields, and the command that was sent. The
//! signatures overlap on short buffers, so they are tried in a fixed order
//! and the first match wins:
//!
//! 1. weight      - `len >= 43`, function `r`, register `0107`
//! 2. status      - `len >= 16`, function `r`, register `0100`
//! 3. tare        - command was the execute-tare frame, `len >= 16`
//! 4. preset tare - command writes register `0808`, `len >= 16`, function `w`
//!
//! Anything else decodes to an error outcome carrying the raw bytes.
//!
//! A checksum mismatch never rejects a frame; it is reported as
//! `lrc_valid: false` on the decoded outcome.

use std::ops::Range;

use tracing::{debug, trace, warn};

use hfscale_types::{CommandResult, Outcome, StatusCode, StatusFlags, StatusReport, WeightReading};

use crate::checksum;
use crate::command::{Command, Function, Register};
use crate::constants::{ETX, STX, min_len, offsets};

/// A structural signature: a predicate over (reply, command) and its parser
struct Signature {
    name: &'static str,
    matches: fn(&[u8], &[u8]) -> bool,
    parse: fn(&[u8], &[u8]) -> Outcome,
}

/// Evaluated in order; the first match wins
const SIGNATURES: &[Signature] = &[
    Signature {
        name: "weight",
        matches: is_weight,
        parse: parse_weight,
    },
    Signature {
        name: "status",
        matches: is_status,
        parse: parse_status,
    },
    Signature {
        name: "tare",
        matches: is_tare,
        parse: parse_tare,
    },
    Signature {
        name: "preset tare",
        matches: is_preset_tare,
        parse: parse_preset_tare,
    },
];

/// Decode a reply to `command`
///
/// `data` is everything received so far. Decoding never fails; a reply that
/// matches no signature yields [`Outcome::Error`] with the bytes as hex.
///
/// # Examples
///
/// ```
/// use hfscale_core::{Command, decode_response};
///
/// let outcome = decode_response(b"\x02", &Command::ReadWeight.encode());
/// assert!(outcome.is_error());
/// ```
pub fn decode_response(data: &[u8], command: &[u8]) -> Outcome {
    if !is_structurally_plausible(data) {
        trace!(len = data.len(), "Reply not plausible yet");
        return unrecognized(data);
    }

    match SIGNATURES.iter().find(|sig| (sig.matches)(data, command)) {
        Some(sig) => {
            trace!(signature = sig.name, len = data.len(), "Matched reply signature");
            (sig.parse)(data, command)
        }
        None => unrecognized(data),
    }
}

/// Cheap structural guard
///
/// Requires the minimum frame length, a leading STX and an ETX somewhere in
/// the buffer. Passing does not mean the reply can be classified.
pub fn is_structurally_plausible(data: &[u8]) -> bool {
    data.len() >= min_len::PLAUSIBLE && data[0] == STX && data.contains(&ETX)
}

fn unrecognized(data: &[u8]) -> Outcome {
    Outcome::error_with_raw("Invalid or unrecognized response", hex::encode(data))
}

fn field(data: &[u8], range: Range<usize>) -> String {
    String::from_utf8_lossy(&data[range]).into_owned()
}

fn function_is(data: &[u8], function: Function) -> bool {
    data[offsets::FUNCTION] == function.response_code()
}

fn register_is(data: &[u8], register: Register) -> bool {
    register.matches(&data[offsets::REGISTER])
}

/// Compare the declared checksum against the one computed over `data[1..end]`
fn check_lrc(kind: &str, data: &[u8], end: usize, declared: &str) -> bool {
    let computed = checksum::compute(data, offsets::LRC_START, end);
    let valid = computed == declared;

    debug!(kind, computed = %computed, received = %declared, "LRC check");
    if !valid {
        warn!(kind, computed = %computed, received = %declared, "LRC mismatch, keeping decoded reply");
    }

    valid
}

// ---------------------------------------------------------------------------
// Weight
// ---------------------------------------------------------------------------

fn is_weight(data: &[u8], _command: &[u8]) -> bool {
    data.len() >= min_len::WEIGHT
        && function_is(data, Function::Read)
        && register_is(data, Register::Weight)
}

fn parse_weight(data: &[u8], _command: &[u8]) -> Outcome {
    let gross = field(data, offsets::GROSS);
    let tare = field(data, offsets::TARE);
    let flags = field(data, offsets::FLAGS);
    let lrc = field(data, offsets::WEIGHT_LRC);

    let lrc_valid = check_lrc("weight", data, offsets::FLAGS.end, &lrc);

    let weight = match (parse_reading(&gross), parse_reading(&tare)) {
        (Some(gross), Some(tare)) => Some(gross - tare),
        _ => None,
    };

    let status_flags = StatusFlags::from_field(&flags);

    Outcome::Weight(WeightReading {
        unit: "kg".to_string(),
        gross,
        tare,
        flags,
        lrc,
        lrc_valid,
        weight,
        status_flags,
    })
}

/// Numeric value of a gross/tare field such as `"W    12.340"`
///
/// The leading type letter is dropped before parsing.
fn parse_reading(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    let digits = match trimmed.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => &trimmed[1..],
        _ => trimmed,
    };

    digits.trim().parse().ok()
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

fn is_status(data: &[u8], _command: &[u8]) -> bool {
    data.len() >= min_len::STATUS
        && function_is(data, Function::Read)
        && register_is(data, Register::Status)
}

fn parse_status(data: &[u8], _command: &[u8]) -> Outcome {
    let declared_len = std::str::from_utf8(&data[offsets::LENGTH])
        .ok()
        .and_then(|len| usize::from_str_radix(len, 16).ok());

    // data field, two LRC characters and ETX must all be present
    let Some(len) = declared_len.filter(|len| data.len() >= offsets::DATA + len + 3) else {
        return Outcome::error("Incomplete status response");
    };

    let code_end = offsets::DATA + len;
    let code = std::str::from_utf8(&data[offsets::DATA..code_end])
        .ok()
        .and_then(|code| u16::from_str_radix(code, 16).ok());

    let Some(code) = code else {
        return Outcome::error_with_raw("Invalid status code", hex::encode(data));
    };

    let lrc = field(data, code_end..code_end + 2);
    let lrc_valid = check_lrc("status", data, code_end, &lrc);

    Outcome::Status(StatusReport {
        status: StatusCode::new(code),
        lrc,
        lrc_valid,
    })
}

// ---------------------------------------------------------------------------
// Tare
// ---------------------------------------------------------------------------

fn is_tare(data: &[u8], command: &[u8]) -> bool {
    Command::ExecuteTare.matches(command) && data.len() >= min_len::TARE
}

fn parse_tare(data: &[u8], _command: &[u8]) -> Outcome {
    if !(function_is(data, Function::Execute) && register_is(data, Register::Tare)) {
        let function = match Function::from_code(data[offsets::FUNCTION]) {
            Ok(Function::Execute) => "execute",
            Ok(Function::Write) => "write",
            _ => "unknown",
        };

        return Outcome::error(format!(
            "Unexpected response: function={}, address={}",
            function,
            field(data, offsets::REGISTER)
        ));
    }

    let result = data[offsets::RESULT_CODE] as char;
    let message = match result {
        '0' => "tare executed successfully".to_string(),
        '1' => "tare failed: Sealing switch locked".to_string(),
        other => format!("tare failed: Error code {other}"),
    };

    let lrc = field(data, offsets::RESULT_LRC);
    let lrc_valid = check_lrc("tare", data, offsets::RESULT_CODE + 1, &lrc);

    Outcome::Tare(CommandResult {
        message,
        lrc,
        lrc_valid,
        success: result == '0',
    })
}

// ---------------------------------------------------------------------------
// Preset tare (set and clear)
// ---------------------------------------------------------------------------

fn is_preset_tare(data: &[u8], command: &[u8]) -> bool {
    (Command::ClearPresetTare.matches(command) || Command::is_preset_tare_write(command))
        && data.len() >= min_len::PRESET_TARE
        && function_is(data, Function::Write)
}

fn parse_preset_tare(data: &[u8], command: &[u8]) -> Outcome {
    let clearing = Command::ClearPresetTare.matches(command);
    let kind = if clearing { "clearPreset" } else { "presetTare" };

    let result = data[offsets::RESULT_CODE] as char;
    let message = match result {
        '0' if clearing => "Preset tare cleared successfully".to_string(),
        '0' => "Preset tare set successfully".to_string(),
        '1' => format!("{kind} failed: Sealing switch locked"),
        '5' => format!("{kind} already set/clear or firmware quirk"),
        other => format!("{kind} failed: Error code {other}"),
    };

    let lrc = field(data, offsets::RESULT_LRC);
    let lrc_valid = check_lrc(kind, data, offsets::RESULT_CODE + 1, &lrc);

    let result = CommandResult {
        message,
        lrc,
        lrc_valid,
        success: result == '0',
    };

    if clearing {
        Outcome::ClearPreset(result)
    } else {
        Outcome::PresetTare(result)
    }
}
