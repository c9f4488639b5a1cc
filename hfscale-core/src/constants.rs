//! Protocol constants

/// Start of frame
pub const STX: u8 = 0x02;

/// End of frame
pub const ETX: u8 = 0x03;

/// Line terminator following ETX
pub const CRLF: [u8; 2] = [0x0D, 0x0A];

/// Device address field (always "00")
pub const DEVICE_ADDRESS: &[u8; 2] = b"00";

/// Command class field (always "FF")
pub const COMMAND_CLASS: &[u8; 2] = b"FF";

/// Default response deadline, measured from the connection attempt (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Largest preset tare the scale hardware accepts, in grams
pub const PRESET_TARE_MAX_GRAMS: u32 = 30_000;

/// Width of the preset tare data field
pub const PRESET_TARE_DIGITS: usize = 8;

/// Width of the clear-preset data field
pub const CLEAR_PRESET_DIGITS: usize = 10;

/// Width of the data field for read and execute commands
pub const PLAIN_DATA_DIGITS: usize = 4;

/// Response field offsets
///
/// ```text
/// ┌─────┬──────┬──────┬──────┬──────────┬────────┬─────────┬─────┬─────┬──────┐
/// │ STX │ addr │ "FF" │ func │ register │ length │  data   │ LRC │ ETX │ CRLF │
/// │  0  │ 1..3 │ 3..5 │  5   │  6..10   │ 10..12 │ 12..n   │ n+2 │     │      │
/// └─────┴──────┴──────┴──────┴──────────┴────────┴─────────┴─────┴─────┴──────┘
/// ```
///
/// The LRC covers everything from the address through the data field.
pub mod offsets {
    use std::ops::Range;

    pub const FUNCTION: usize = 5;
    pub const REGISTER: Range<usize> = 6..10;
    pub const LENGTH: Range<usize> = 10..12;
    pub const DATA: usize = 12;

    /// First byte covered by the LRC
    pub const LRC_START: usize = 1;

    pub const GROSS: Range<usize> = 12..23;
    pub const TARE: Range<usize> = 23..34;
    pub const FLAGS: Range<usize> = 34..38;
    pub const WEIGHT_LRC: Range<usize> = 38..40;

    /// Single-character result code of tare and preset-tare replies
    pub const RESULT_CODE: usize = 12;
    pub const RESULT_LRC: Range<usize> = 13..15;
}

/// Minimum lengths used by structural classification
pub mod min_len {
    /// Anything shorter is never plausible
    pub const PLAUSIBLE: usize = 12;
    pub const WEIGHT: usize = 43;
    pub const STATUS: usize = 16;
    pub const TARE: usize = 16;
    pub const PRESET_TARE: usize = 16;
}
