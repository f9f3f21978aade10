//! Delimiter-based line reading over any async byte stream
//!
//! Serial ports and sockets deliver bytes in arbitrary chunks: one chunk may
//! carry half a line, or a query's echo and its answer together. The
//! reader keeps whatever follows a delimiter for the next call.

use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;
use tracing::trace;

use crate::error::{Error, Result};

const READ_CHUNK: usize = 256;

/// Buffered line reader
#[derive(Debug)]
pub struct LineReader {
    buf: BytesMut,
    max_len: usize,
}

impl LineReader {
    /// Create a reader that gives up once `max_len` bytes are buffered
    /// without a delimiter
    pub fn new(max_len: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(READ_CHUNK),
            max_len,
        }
    }
    
    /// Bytes received but not yet returned
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
    
    /// Drop any buffered bytes
    pub fn clear(&mut self) {
        self.buf.clear();
    }
    
    /// Read from `reader` until `delimiter` is seen
    ///
    /// `limit` is a deadline for the whole call. On timeout any partial
    /// line stays buffered; on [`Error::LineTooLong`] it is discarded.
    pub async fn read_until<R>(
        &mut self,
        reader: &mut R,
        delimiter: &[u8],
        limit: Duration,
    ) -> Result<BytesMut>
    where
        R: AsyncRead + Unpin,
    {
        if delimiter.is_empty() {
            return Err(Error::EmptyDelimiter);
        }
        
        if let Some(line) = self.take_line(delimiter) {
            return Ok(line);
        }
        
        let result = timeout(limit, self.fill_until(reader, delimiter)).await;
        
        match result {
            Ok(line) => line,
            Err(_) => {
                trace!("Read timeout with {} bytes buffered", self.buf.len());
                Err(Error::ReadTimeout { timeout: limit })
            }
        }
    }
    
    async fn fill_until<R>(&mut self, reader: &mut R, delimiter: &[u8]) -> Result<BytesMut>
    where
        R: AsyncRead + Unpin,
    {
        loop {
            self.buf.reserve(READ_CHUNK);
            let n = reader.read_buf(&mut self.buf).await?;
            
            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
            
            if let Some(line) = self.take_line(delimiter) {
                return Ok(line);
            }
            
            if self.buf.len() >= self.max_len {
                // The partial line can never complete within the limit
                self.buf.clear();
                return Err(Error::LineTooLong { limit: self.max_len });
            }
        }
    }
    
    fn take_line(&mut self, delimiter: &[u8]) -> Option<BytesMut> {
        let end = self
            .buf
            .windows(delimiter.len())
            .position(|window| window == delimiter)?
            + delimiter.len();
        
        Some(self.buf.split_to(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::AsyncWriteExt;
    
    const CRLF: &[u8] = b"\r\n";
    
    #[tokio::test]
    async fn test_two_lines_in_one_chunk() {
        let mut reader = LineReader::new(1024);
        let mut src: &[u8] = b"WAVE?\r\n500.000\r\n";
        
        let first = reader.read_until(&mut src, CRLF, Duration::from_secs(1)).await.unwrap();
        assert_eq!(&first[..], b"WAVE?\r\n");
        assert_eq!(reader.buffered(), 9);
        
        let second = reader.read_until(&mut src, CRLF, Duration::from_secs(1)).await.unwrap();
        assert_eq!(&second[..], b"500.000\r\n");
        assert_eq!(reader.buffered(), 0);
    }
    
    #[tokio::test]
    async fn test_line_split_across_chunks() {
        let (mut client, mut device) = tokio::io::duplex(64);
        let mut reader = LineReader::new(1024);
        
        device.write_all(b"GRAT 2").await.unwrap();
        device.write_all(b"\r").await.unwrap();
        device.write_all(b"\n").await.unwrap();
        
        let line = reader.read_until(&mut client, CRLF, Duration::from_secs(1)).await.unwrap();
        assert_eq!(&line[..], b"GRAT 2\r\n");
    }
    
    #[tokio::test(start_paused = true)]
    async fn test_timeout_without_terminator() {
        let (mut client, mut device) = tokio::io::duplex(64);
        let mut reader = LineReader::new(1024);
        
        device.write_all(b"60").await.unwrap();
        
        let result = reader.read_until(&mut client, CRLF, Duration::from_millis(200)).await;
        
        assert!(matches!(
            result,
            Err(Error::ReadTimeout { timeout: elapsed }) if elapsed == Duration::from_millis(200)
        ));
        assert_eq!(reader.buffered(), 2);
    }
    
    #[tokio::test]
    async fn test_closed_stream() {
        let mut reader = LineReader::new(1024);
        let mut src: &[u8] = b"partial";
        
        let result = reader.read_until(&mut src, CRLF, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(Error::ConnectionClosed)));
    }
    
    #[tokio::test]
    async fn test_line_too_long() {
        let mut reader = LineReader::new(8);
        let mut src: &[u8] = b"0123456789ABCDEF";
        
        let result = reader.read_until(&mut src, CRLF, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(Error::LineTooLong { limit: 8 })));
        assert_eq!(reader.buffered(), 0);
    }
    
    #[tokio::test]
    async fn test_runaway_stream_stays_bounded() {
        let data = vec![b'x'; 4000];
        let mut src: &[u8] = &data;
        let mut reader = LineReader::new(8);
        
        for _ in 0..5 {
            let result = reader.read_until(&mut src, CRLF, Duration::from_secs(1)).await;
            
            assert!(matches!(result, Err(Error::LineTooLong { limit: 8 })));
            assert!(reader.buffered() <= 8);
        }
    }
    
    #[tokio::test]
    async fn test_reads_resume_after_overflow() {
        let mut reader = LineReader::new(8);
        let mut src: &[u8] = b"0123456789ABCDEF";
        
        let result = reader.read_until(&mut src, CRLF, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(Error::LineTooLong { .. })));
        
        let mut src: &[u8] = b"OK\r\n";
        let line = reader.read_until(&mut src, CRLF, Duration::from_secs(1)).await.unwrap();
        assert_eq!(&line[..], b"OK\r\n");
    }
    
    #[tokio::test]
    async fn test_empty_delimiter() {
        let mut reader = LineReader::new(8);
        let mut src: &[u8] = b"x";
        
        let result = reader.read_until(&mut src, b"", Duration::from_secs(1)).await;
        assert!(matches!(result, Err(Error::EmptyDelimiter)));
    }
}
