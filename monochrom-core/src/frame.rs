//! Line framing for the monochromator's ASCII protocol
//!
//! # Frame Structure
//!
//! ```text
//! ┌──────────────────────────────┬────────────┐
//! │  Command text (uppercased)   │ Terminator │
//! │  ASCII, N bytes              │  CR LF     │
//! └──────────────────────────────┴────────────┘
//! ```
//!
//! Responses use the same terminator. The device is case-insensitive, but
//! every outgoing frame is normalized to uppercase.

use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::{
    constants::TERMINATOR,
    error::{Error, Result},
};

/// One outgoing command line, before encoding
///
/// # Examples
///
/// ```
/// use monochrom_core::Frame;
///
/// let frame = Frame::new("gowave 500.000");
/// let bytes = frame.encode().unwrap();
/// assert_eq!(&bytes[..], b"GOWAVE 500.000\r\n");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    text: String,
}

impl Frame {
    /// Create a frame from a command line without terminator
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
    
    /// The command text as given, without terminator
    pub fn text(&self) -> &str {
        &self.text
    }
    
    /// Encoded size in bytes, terminator included
    pub fn size(&self) -> usize {
        self.text.len() + TERMINATOR.len()
    }
    
    /// Encode the frame to wire bytes
    ///
    /// The terminator is appended first and the whole line is then
    /// uppercased and encoded as ASCII.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonAsciiText`] if the text holds a non-ASCII character.
    pub fn encode(&self) -> Result<BytesMut> {
        if let Some(position) = self.text.bytes().position(|b| !b.is_ascii()) {
            return Err(Error::NonAsciiText {
                text: self.text.clone(),
                position,
            });
        }
        
        let mut buf = BytesMut::with_capacity(self.size());
        buf.put_slice(self.text.as_bytes());
        buf.put_slice(TERMINATOR);
        buf.make_ascii_uppercase();
        
        Ok(buf)
    }
}

/// Decode one received line
///
/// The returned string still carries the terminator; callers strip it.
///
/// # Errors
///
/// Returns [`Error::InvalidLineBytes`] on the first byte outside ASCII.
pub fn decode_line(bytes: &[u8]) -> Result<String> {
    if let Some(position) = bytes.iter().position(|b| !b.is_ascii()) {
        return Err(Error::InvalidLineBytes {
            byte: bytes[position],
            position,
        });
    }
    
    // ASCII is a subset of UTF-8
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("text", &self.text)
            .field("size", &self.size())
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\r\\n", self.text.to_ascii_uppercase())
    }
}
