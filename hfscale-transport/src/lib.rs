//! Transport layer for the scale protocol
//!
//! Provides TCP communication with scales.

pub mod error;
pub mod tcp;

pub use error::{Error, Result};
pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for different communication methods
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect to device
    async fn connect(&mut self) -> Result<()>;
    
    /// Disconnect from device
    async fn disconnect(&mut self) -> Result<()>;
    
    /// Check if connected
    fn is_connected(&self) -> bool;
    
    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;
    
    /// Receive whatever the next read yields (with timeout)
    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut>;
    
    /// Get remote address
    fn remote_addr(&self) -> String;
}
