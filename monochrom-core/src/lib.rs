//! # monochrom-core
//!
//! Core protocol implementation for serial grating monochromators.
//!
//! This crate provides the low-level protocol primitives:
//! - Line framing (uppercase, CR/LF terminator, ASCII encoding)
//! - Command line construction and query normalization
//! - Query result pairing (statement echo + response)
//! - Connection session bookkeeping
//! - Protocol constants

pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod query;
pub mod session;

pub use command::Command;
pub use error::{Error, Result};
pub use frame::Frame;
pub use query::QueryResult;
pub use session::{ExchangeStats, Session, SessionState};
pub use constants::TERMINATOR;
