//! High-level error types

use hfscale_types::Outcome;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] hfscale_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] hfscale_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] hfscale_types::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Device directory error: {0}")]
    Directory(String),
    
    #[error("Device with specified IP not found")]
    DeviceNotFound(String),
    
    #[error("Value query parameter required")]
    MissingValue,
}

impl Error {
    /// Flatten into the uniform error outcome returned to callers
    ///
    /// Wrapped errors contribute their own message without the layer prefix.
    pub fn to_outcome(&self) -> Outcome {
        let message = match self {
            Self::Core(e) => e.to_string(),
            Self::Transport(e) => e.to_string(),
            Self::Types(e) => e.to_string(),
            other => other.to_string(),
        };

        Outcome::error(message)
    }
}

impl From<Error> for Outcome {
    fn from(err: Error) -> Self {
        err.to_outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_outcome() {
        let err: Error = hfscale_core::Command::preset_tare(42.0).unwrap_err().into();
        let outcome = Outcome::from(err);

        assert_eq!(outcome.error_message(), Some("Value must be between 0.0 and 30.0 kg"));
    }

    #[test]
    fn test_not_found_outcome() {
        let outcome = Error::DeviceNotFound("10.0.0.9".into()).to_outcome();
        assert_eq!(outcome.error_message(), Some("Device with specified IP not found"));
    }
}
