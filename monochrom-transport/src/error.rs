//! Transport errors

use std::io;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not connected")]
    NotConnected,
    
    #[error("Already open")]
    AlreadyOpen,
    
    #[error("Connection timeout")]
    ConnectionTimeout,
    
    #[error("Read timeout after {timeout:?} without a line terminator")]
    ReadTimeout {
        timeout: Duration,
    },
    
    #[error("Connection closed by remote")]
    ConnectionClosed,
    
    #[error("Line exceeds {limit} bytes without a terminator")]
    LineTooLong {
        limit: usize,
    },
    
    #[error("Read delimiter must not be empty")]
    EmptyDelimiter,
    
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    
    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),
    
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
