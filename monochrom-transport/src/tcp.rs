//! TCP transport for monochromators behind a serial device server
//!
//! Terminal servers expose the instrument's RS-232 port as a raw TCP
//! socket. The byte stream is the same as on a local serial port.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use monochrom_core::constants::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, MAX_LINE_LENGTH};

use crate::{error::*, line::LineReader, Transport};

/// TCP transport for monochromators
pub struct TcpTransport {
    addr: String,
    port: u16,
    socket_addr: Option<SocketAddr>,
    stream: Option<TcpStream>,
    reader: LineReader,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl TcpTransport {
    /// Create new TCP transport
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
            socket_addr: None,
            stream: None,
            reader: LineReader::new(MAX_LINE_LENGTH),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
    
    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
    
    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
    
    /// Resolve address to SocketAddr
    async fn resolve_addr(&mut self) -> Result<SocketAddr> {
        if let Some(addr) = self.socket_addr {
            return Ok(addr);
        }
        
        let addr_str = format!("{}:{}", self.addr, self.port);
        
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", addr_str, e)))?
            .collect();
        
        let addr = addrs
            .first()
            .ok_or_else(|| Error::InvalidAddress(format!("No addresses found for {}", addr_str)))?;
        
        self.socket_addr = Some(*addr);
        Ok(*addr)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(Error::AlreadyOpen);
        }
        
        let addr = self.resolve_addr().await?;
        
        debug!("Connecting to {}...", addr);
        
        let stream = timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::ConnectionTimeout)?
            .map_err(Error::Io)?;
        
        // Disable Nagle's algorithm, frames are tiny
        stream.set_nodelay(true)?;
        
        debug!("Connected to {}", addr);
        
        self.reader.clear();
        self.stream = Some(stream);
        Ok(())
    }
    
    fn close(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            debug!("Disconnecting from {}...", self.endpoint());
            drop(stream);
        }
        
        self.reader.clear();
        self.socket_addr = None;
        Ok(())
    }
    
    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
    
    async fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;
        
        trace!("Sending {} bytes: {:?}", data.len(), String::from_utf8_lossy(data));
        
        stream.write_all(data).await?;
        stream.flush().await?;
        
        Ok(data.len())
    }
    
    async fn read_until(&mut self, delimiter: &[u8], limit: Duration) -> Result<BytesMut> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;
        
        let line = self.reader.read_until(stream, delimiter, limit).await?;
        
        trace!("Received {} bytes: {:?}", line.len(), String::from_utf8_lossy(&line));
        
        Ok(line)
    }
    
    fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
    
    fn endpoint(&self) -> String {
        self.socket_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.addr, self.port))
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.is_open() {
            warn!("TCP transport dropped while still connected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::net::TcpListener;
    
    #[tokio::test]
    async fn test_tcp_transport_create() {
        let transport = TcpTransport::new("192.168.1.50", 4001);
        assert!(!transport.is_open());
        assert_eq!(transport.endpoint(), "192.168.1.50:4001");
    }
    
    #[tokio::test]
    async fn test_tcp_transport_invalid_address() {
        let mut transport = TcpTransport::new("invalid..address", 4001)
            .with_connect_timeout(Duration::from_millis(100));
        
        let result = transport.open().await;
        assert!(result.is_err());
    }
    
    #[tokio::test]
    async fn test_tcp_transport_line_exchange() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 7];
            tokio::io::AsyncReadExt::read_exact(&mut socket, &mut buf).await.unwrap();
            assert_eq!(&buf, b"WAVE?\r\n");
            socket.write_all(b"WAVE?\r\n500.000\r\n").await.unwrap();
            socket
        });
        
        let mut transport = TcpTransport::new("127.0.0.1", port);
        transport.open().await.unwrap();
        
        assert_eq!(transport.write_bytes(b"WAVE?\r\n").await.unwrap(), 7);
        
        let echo = transport.read_until(b"\r\n", Duration::from_secs(1)).await.unwrap();
        let value = transport.read_until(b"\r\n", Duration::from_secs(1)).await.unwrap();
        assert_eq!(&echo[..], b"WAVE?\r\n");
        assert_eq!(&value[..], b"500.000\r\n");
        
        transport.close().unwrap();
        assert!(!transport.is_open());
        transport.close().unwrap();
        
        let _socket = server.await.unwrap();
    }
}
