//! # monochrom
//!
//! Driver for motorized grating monochromators controlled over a serial
//! line with a CR/LF-terminated ASCII command protocol.
//!
//! ## Features
//!
//! - Typed operations: wavelength, grating, shutter, output port, slits
//! - Async/await API using Tokio
//! - Serial and TCP (device server) transports
//! - Deterministic port release on disconnect or drop
//!
//! ## Quick Start
//!
//! ```no_run
//! use monochrom::Monochromator;
//!
//! #[tokio::main]
//! async fn main() -> monochrom::Result<()> {
//!     // Open the serial port
//!     let mut mono = Monochromator::serial("/dev/ttyUSB0");
//!     mono.connect().await?;
//!     
//!     // Move and read back
//!     let nm = mono.goto_wavelength(532.0).await?;
//!     println!("At {:.3} nm", nm);
//!     
//!     // Disconnect
//!     mono.disconnect()?;
//!     
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod monochromator;

// Re-exports
pub use error::{Error, Result};
pub use monochromator::Monochromator;

// Re-export types
pub use monochrom_core::{Command, ExchangeStats, QueryResult};
pub use monochrom_transport::{SerialConfig, SerialTransport, TcpTransport, Transport};
pub use monochrom_types::{DeviceStatus, GratingDescriptor, Shutter, Units};
