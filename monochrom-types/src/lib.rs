//! Type definitions for monochrom

pub mod error;
pub mod grating;
pub mod parse;
pub mod shutter;
pub mod status;
pub mod units;

pub use error::{Error, Result};
pub use grating::GratingDescriptor;
pub use shutter::Shutter;
pub use status::DeviceStatus;
pub use units::Units;
