//! # hfscale-core
//!
//! Core protocol implementation for HF2211 networked weighing scales.
//!
//! This crate provides the low-level protocol primitives:
//! - Command frame encoding
//! - LRC checksum calculation
//! - Structural response classification and decoding
//! - The per-command session state machine (no I/O)

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod response;
pub mod session;

pub use command::{Command, Function, Register};
pub use error::{Error, Result};
pub use response::{decode_response, is_structurally_plausible};
pub use session::{Session, SessionState, Step};
