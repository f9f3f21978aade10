//! Error types for monochrom-core

/// Result type alias for monochrom-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Outgoing text cannot be represented in ASCII
    #[error("Cannot encode {text:?}: non-ASCII character at byte {position}")]
    NonAsciiText {
        text: String,
        position: usize,
    },
    
    /// Incoming bytes are not valid ASCII
    #[error("Cannot decode line: invalid byte 0x{byte:02X} at offset {position}")]
    InvalidLineBytes {
        byte: u8,
        position: usize,
    },
}
