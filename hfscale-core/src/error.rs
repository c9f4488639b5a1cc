//! Error types for hfscale-core

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Codec errors
///
/// Decoding never fails: unrecognized replies are reported as an error
/// outcome. These errors only arise while building commands or parsing
/// frame fields.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Preset tare value is negative, not a number or above the hardware limit
    #[error("Value must be between 0.0 and 30.0 kg")]
    OutOfRange {
        value: String,
    },

    /// Register field is not one the scale understands
    #[error("Unknown register address: {0}")]
    UnknownRegister(String),

    /// Function code byte is not R/W/E (or r/w/e)
    #[error("Unknown function code: 0x{0:02X}")]
    UnknownFunction(u8),
}
