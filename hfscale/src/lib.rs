//! # hfscale
//!
//! Rust client for HF2211 networked weighing scales.
//!
//! ## Features
//!
//! - Type-safe command encoding and structural reply decoding
//! - Async/await API using Tokio, one TCP connection per command
//! - Automatic preset-tare clear after a successful tare
//! - JSON-ready outcomes for HTTP front ends
//!
//! ## Quick Start
//!
//! ```no_run
//! use hfscale::Scale;
//!
//! #[tokio::main]
//! async fn main() {
//!     let scale = Scale::new("192.168.1.50", 4001);
//!
//!     // Read the current weight
//!     let outcome = scale.read_weight().await;
//!     println!("{}", outcome);
//!
//!     // Tare (also clears any preset tare)
//!     let outcome = scale.execute_tare().await;
//!     println!("{}", outcome);
//! }
//! ```

pub mod config;
pub mod device;
pub mod directory;
pub mod error;
pub mod service;

// Re-exports
pub use config::{ConfigError, ScaleConfig};
pub use device::{DEFAULT_TIMEOUT, Scale, run_session, send_command, send_command_with_timeout};
pub use directory::{DeviceDirectory, StaticDirectory};
pub use error::{Error, Result};
pub use service::ScaleService;

// Re-export types
pub use hfscale_core::{Command, Session, SessionState};
pub use hfscale_transport::{TcpTransport, Transport};
pub use hfscale_types::{DeviceRecord, Outcome, ScaleAddress, StatusFlags};
