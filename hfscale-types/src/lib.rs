//! Type definitions for hfscale
//!
//! Values shared by the codec, the session and the facade. Everything a
//! caller receives from a scale operation is an [`Outcome`], which serializes
//! to the JSON shape HTTP clients already depend on.

pub mod device;
pub mod error;
pub mod flags;
pub mod outcome;
pub mod status;

pub use device::{DeviceRecord, ScaleAddress};
pub use error::{Error, Result};
pub use flags::{StatusFlags, TareMode};
pub use outcome::{CommandResult, Failure, Outcome, StatusReport, WeightReading};
pub use status::{StatusCode, describe_status};
