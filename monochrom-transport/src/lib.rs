//! Transport layer for monochromator control
//!
//! Provides serial and TCP byte streams with line-oriented reads.

pub mod error;
pub mod line;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod serial;
pub mod tcp;

pub use error::{Error, Result};
pub use line::LineReader;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockTransport, Responder, SimulatedMonochromator};
pub use serial::{DataBits, FlowControl, Parity, SerialConfig, SerialTransport, StopBits};
pub use tcp::TcpTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Transport trait for different communication methods
///
/// A transport is owned by exactly one driver. Reads and writes are never
/// issued concurrently.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the underlying port
    async fn open(&mut self) -> Result<()>;
    
    /// Close the underlying port
    ///
    /// Synchronous and idempotent: closing a closed transport succeeds.
    fn close(&mut self) -> Result<()>;
    
    /// Check if open
    fn is_open(&self) -> bool;
    
    /// Write raw bytes, returning the number written
    async fn write_bytes(&mut self, data: &[u8]) -> Result<usize>;
    
    /// Read until `delimiter` is seen or `timeout` elapses
    ///
    /// The returned bytes include the delimiter. Bytes received past the
    /// delimiter are kept for the next call.
    async fn read_until(&mut self, delimiter: &[u8], timeout: Duration) -> Result<BytesMut>;
    
    /// Configured read timeout
    fn read_timeout(&self) -> Duration;
    
    /// Human-readable endpoint (port name or address)
    fn endpoint(&self) -> String;
}
