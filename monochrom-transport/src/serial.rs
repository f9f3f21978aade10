//! Serial port transport
//!
//! Monochromators of this family expose an RS-232 port (often through a
//! USB adapter) running 8N1 with no flow control. The default
//! [`SerialConfig`] matches that; only the baud rate usually needs changing.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, error, info, trace, warn};

use monochrom_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT, MAX_LINE_LENGTH};

use crate::{error::*, line::LineReader, Transport};

/// Serial port configuration
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Baud rate (e.g., 9600, 19200)
    pub baud_rate: u32,
    /// Number of data bits
    pub data_bits: DataBits,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Parity checking
    pub parity: Parity,
    /// Flow control
    pub flow_control: FlowControl,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::None,
        }
    }
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Seven,
    Eight,
}

impl From<DataBits> for tokio_serial::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Seven => tokio_serial::DataBits::Seven,
            DataBits::Eight => tokio_serial::DataBits::Eight,
        }
    }
}

/// Number of stop bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

impl From<StopBits> for tokio_serial::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => tokio_serial::StopBits::One,
            StopBits::Two => tokio_serial::StopBits::Two,
        }
    }
}

/// Parity checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

impl From<Parity> for tokio_serial::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => tokio_serial::Parity::None,
            Parity::Odd => tokio_serial::Parity::Odd,
            Parity::Even => tokio_serial::Parity::Even,
        }
    }
}

/// Flow control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    None,
    Software,
    Hardware,
}

impl From<FlowControl> for tokio_serial::FlowControl {
    fn from(flow: FlowControl) -> Self {
        match flow {
            FlowControl::None => tokio_serial::FlowControl::None,
            FlowControl::Software => tokio_serial::FlowControl::Software,
            FlowControl::Hardware => tokio_serial::FlowControl::Hardware,
        }
    }
}

/// Serial transport for monochromators
pub struct SerialTransport {
    port_name: String,
    config: SerialConfig,
    read_timeout: Duration,
    port: Option<SerialStream>,
    reader: LineReader,
}

impl SerialTransport {
    /// Create new serial transport (not yet open)
    ///
    /// * `port_name` - Serial port path (e.g., "/dev/ttyUSB0" on Linux, "COM3" on Windows)
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            config: SerialConfig::default(),
            read_timeout: DEFAULT_READ_TIMEOUT,
            port: None,
            reader: LineReader::new(MAX_LINE_LENGTH),
        }
    }
    
    /// Set full serial configuration
    pub fn with_config(mut self, config: SerialConfig) -> Self {
        self.config = config;
        self
    }
    
    /// Set baud rate, keeping the rest of the configuration
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.config.baud_rate = baud_rate;
        self
    }
    
    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
    
    /// Get the name of the serial port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
    
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(Error::AlreadyOpen);
        }
        
        debug!(
            port = %self.port_name,
            baud_rate = self.config.baud_rate,
            data_bits = ?self.config.data_bits,
            stop_bits = ?self.config.stop_bits,
            parity = ?self.config.parity,
            flow_control = ?self.config.flow_control,
            "Opening serial port"
        );
        
        let stream = tokio_serial::new(&self.port_name, self.config.baud_rate)
            .data_bits(self.config.data_bits.into())
            .stop_bits(self.config.stop_bits.into())
            .parity(self.config.parity.into())
            .flow_control(self.config.flow_control.into())
            .open_native_async()
            .map_err(|e| {
                error!(port = %self.port_name, error = %e, "Failed to open serial port");
                Error::Serial(e)
            })?;
        
        info!(port = %self.port_name, baud_rate = self.config.baud_rate, "Serial port opened");
        
        self.reader.clear();
        self.port = Some(stream);
        Ok(())
    }
    
    fn close(&mut self) -> Result<()> {
        if let Some(port) = self.port.take() {
            debug!(port = %self.port_name, "Closing serial port");
            drop(port);
        }
        
        self.reader.clear();
        Ok(())
    }
    
    fn is_open(&self) -> bool {
        self.port.is_some()
    }
    
    async fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;
        
        trace!(port = %self.port_name, bytes = data.len(), data = ?data, "Sending data");
        
        port.write_all(data).await?;
        port.flush().await?;
        
        Ok(data.len())
    }
    
    async fn read_until(&mut self, delimiter: &[u8], timeout: Duration) -> Result<BytesMut> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;
        
        let line = self.reader.read_until(port, delimiter, timeout).await?;
        
        trace!(port = %self.port_name, bytes = line.len(), data = ?&line[..], "Received line");
        
        Ok(line)
    }
    
    fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
    
    fn endpoint(&self) -> String {
        self.port_name.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_open() {
            warn!(port = %self.port_name, "Serial transport dropped while still open");
        }
    }
}
