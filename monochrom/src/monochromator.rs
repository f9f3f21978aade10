//! High-level monochromator interface

use monochrom_core::command::query_statement;
use monochrom_core::constants::{mnemonics, TERMINATOR};
use monochrom_core::{frame, Command, ExchangeStats, Frame, QueryResult, Session};
use monochrom_transport::{SerialConfig, SerialTransport, TcpTransport, Transport};
use monochrom_types::{parse, DeviceStatus, GratingDescriptor, Shutter, Units};
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};

/// Grating monochromator
///
/// High-level interface over the device's line protocol. Every operation
/// is a write followed by one read (commands) or two reads (queries: the
/// echoed statement, then the answer).
///
/// Operations take `&mut self`, so one exchange always completes before
/// the next begins. To share a driver between tasks, wrap it in a
/// `tokio::sync::Mutex` and hold the lock for each operation.
///
/// Dropping a connected driver closes its transport.
///
/// # Examples
///
/// ```no_run
/// use monochrom::Monochromator;
///
/// #[tokio::main]
/// async fn main() -> monochrom::Result<()> {
///     let mut mono = Monochromator::serial("/dev/ttyUSB0");
///
///     mono.connect().await?;
///     println!("Connected to {}", mono.info().await?);
///
///     mono.set_shutter(false).await?;
///     let grating = mono.grating().await?;
///     println!("Using {}", grating);
///
///     mono.disconnect()?;
///     Ok(())
/// }
/// ```
pub struct Monochromator {
    transport: Box<dyn Transport>,
    session: Session,
}

impl Monochromator {
    /// Create a disconnected driver over any transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            session: Session::new(),
        }
    }

    /// Create a driver on a local serial port with default settings (9600 8N1)
    pub fn serial(port: impl Into<String>) -> Self {
        Self::new(SerialTransport::new(port))
    }

    /// Create a driver on a local serial port with explicit settings
    pub fn serial_with_config(port: impl Into<String>, config: SerialConfig) -> Self {
        Self::new(SerialTransport::new(port).with_config(config))
    }

    /// Create a driver for a device behind a serial-to-Ethernet server
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::new(TcpTransport::new(host, port))
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.session.is_connected() && self.transport.is_open()
    }

    /// Frames written and lines read since the last connect
    pub fn stats(&self) -> ExchangeStats {
        self.session.stats()
    }

    /// Port name or address of the transport
    pub fn endpoint(&self) -> String {
        self.transport.endpoint()
    }

    /// Open the transport
    ///
    /// Connecting an already connected driver does nothing.
    pub async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        info!("Connecting to {}...", self.transport.endpoint());

        if !self.transport.is_open() {
            self.transport.open().await?;
        }
        self.session.open();

        info!("Connected to {}", self.transport.endpoint());
        Ok(())
    }

    /// Close the transport
    ///
    /// Disconnecting a disconnected driver does nothing.
    pub fn disconnect(&mut self) -> Result<()> {
        if self.session.close() == monochrom_core::SessionState::Connected {
            info!("Disconnecting from {}...", self.transport.endpoint());
        }

        self.transport.close()?;
        Ok(())
    }

    // Framing primitives

    /// Frame `message` and write it
    ///
    /// Returns the number of bytes written, terminator included.
    pub async fn write(&mut self, message: &str) -> Result<usize> {
        self.ensure_connected()?;

        let frame = Frame::new(message);
        let data = frame.encode()?;

        trace!("Sending: {}", frame);

        let written = self.transport.write_bytes(&data).await?;
        self.session.record_write();

        Ok(written)
    }

    /// Read one line, terminator included
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if no terminator arrives within the transport's read timeout
    /// - [`Error::Encoding`] if the line holds non-ASCII bytes
    /// - [`Error::Transport`] on I/O failure
    pub async fn read(&mut self) -> Result<String> {
        self.ensure_connected()?;

        let timeout = self.transport.read_timeout();
        let raw = self.transport.read_until(TERMINATOR, timeout).await?;
        self.session.record_read();

        let line = frame::decode_line(&raw)?;

        trace!("Received: {:?}", line);

        Ok(line)
    }

    /// Send a command and consume its single acknowledgement line
    ///
    /// Returns the acknowledgement with trailing whitespace removed.
    pub async fn command(&mut self, command: impl Into<Command>) -> Result<String> {
        let command = command.into();

        self.write(&command.line()).await?;
        let ack = self.read().await?;

        Ok(ack.trim_end().to_string())
    }

    /// Send a query and consume both reply lines
    ///
    /// `message` is a bare command name; `?` is appended if missing. The
    /// first line read is the device's echo, the second is the answer.
    /// Exactly one write and two reads happen, in that order.
    pub async fn query(&mut self, message: &str) -> Result<QueryResult> {
        let statement = query_statement(message);

        self.write(&statement).await?;
        let echo = self.read().await?;
        let response = self.read().await?;

        let result = QueryResult::new(echo, response);

        // No resync: a stray status line would shift every later query.
        if !result.echo_matches(&statement) {
            warn!("Echo {:?} does not match query {:?}", result.statement, statement);
        }

        Ok(result)
    }

    // Typed operations

    /// Get the device identification string
    pub async fn info(&mut self) -> Result<String> {
        debug!("Getting device info...");
        Ok(self.query(mnemonics::INFO).await?.response)
    }

    /// Get the current wavelength
    pub async fn position(&mut self) -> Result<f64> {
        let result = self.query(mnemonics::WAVE).await?;
        Ok(parse::float(&result.response)?)
    }

    /// Move to `nm` and return the position the device reports afterwards
    ///
    /// The target is sent with three decimals. The returned value is read
    /// back from the device, not the commanded value.
    pub async fn goto_wavelength(&mut self, nm: f64) -> Result<f64> {
        debug!("Moving to {:.3}...", nm);

        self.command(Command::new(mnemonics::GOWAVE).arg(format!("{:.3}", nm)))
            .await?;

        let position = self.position().await?;
        debug!("Now at {:.3}", position);

        Ok(position)
    }

    /// Stop any motion in progress
    pub async fn abort(&mut self) -> Result<()> {
        debug!("Aborting motion...");
        self.command(mnemonics::ABORT).await?;
        Ok(())
    }

    /// Get the active grating
    pub async fn grating(&mut self) -> Result<GratingDescriptor> {
        let result = self.query(mnemonics::GRAT).await?;
        Ok(GratingDescriptor::parse(&result.response)?)
    }

    /// Select grating `number`
    pub async fn set_grating(&mut self, number: u32) -> Result<()> {
        debug!("Selecting grating {}...", number);
        self.command(Command::new(mnemonics::GRAT).arg(number)).await?;
        Ok(())
    }

    /// Get the shutter position
    pub async fn shutter(&mut self) -> Result<Shutter> {
        let result = self.query(mnemonics::SHUTTER).await?;
        Ok(Shutter::from_response(&result.response))
    }

    /// Check whether the shutter is closed
    ///
    /// Only an exact `C` response counts as closed.
    pub async fn shuttered(&mut self) -> Result<bool> {
        Ok(self.shutter().await?.is_closed())
    }

    /// Close (`true`) or open (`false`) the shutter
    pub async fn set_shutter(&mut self, close: bool) -> Result<()> {
        let shutter = Shutter::from_closed(close);
        debug!("Setting shutter {}...", shutter);

        self.command(Command::new(mnemonics::SHUTTER).arg(shutter.code()))
            .await?;
        Ok(())
    }

    /// Get the selected output port
    pub async fn output_port(&mut self) -> Result<i64> {
        let result = self.query(mnemonics::OUTPORT).await?;
        Ok(parse::integer(&result.response)?)
    }

    /// Select output port `port`
    pub async fn set_output_port(&mut self, port: i64) -> Result<()> {
        self.command(Command::new(mnemonics::OUTPORT).arg(port)).await?;
        Ok(())
    }

    /// Get, and optionally first set, the width of slit `slit` in microns
    ///
    /// With `Some(width)` the width is sent before querying. The query
    /// always runs, so the return value is what the device reports.
    pub async fn slit_width(&mut self, slit: u8, width: Option<i64>) -> Result<i64> {
        let name = mnemonics::slit_microns(slit);

        if let Some(width) = width {
            debug!("Setting slit {} to {} um...", slit, width);
            self.command(Command::new(name.as_str()).arg(width)).await?;
        }

        let result = self.query(&name).await?;
        Ok(parse::integer(&result.response)?)
    }

    /// Get the wavelength units
    pub async fn units(&mut self) -> Result<Units> {
        let result = self.query(mnemonics::UNITS).await?;
        Ok(result.response.parse::<Units>()?)
    }

    /// Set the wavelength units used by every later move and position
    pub async fn set_units(&mut self, units: Units) -> Result<()> {
        self.command(Command::new(mnemonics::UNITS).arg(units.code()))
            .await?;
        Ok(())
    }

    /// Get the filter wheel position
    pub async fn filter(&mut self) -> Result<i64> {
        let result = self.query(mnemonics::FILTER).await?;
        Ok(parse::integer(&result.response)?)
    }

    /// Move the filter wheel to `position`
    pub async fn set_filter(&mut self, position: i64) -> Result<()> {
        self.command(Command::new(mnemonics::FILTER).arg(position)).await?;
        Ok(())
    }

    /// Get the grating motor position in steps
    pub async fn step(&mut self) -> Result<i64> {
        let result = self.query(mnemonics::STEP).await?;
        Ok(parse::integer(&result.response)?)
    }

    /// Get the status byte
    pub async fn status(&mut self) -> Result<DeviceStatus> {
        let result = self.query(mnemonics::STB).await?;
        let raw = parse::integer(&result.response)?;

        let raw = u8::try_from(raw).map_err(|_| monochrom_types::Error::InvalidNumber {
            expected: "status byte (0-255)",
            value: result.response.clone(),
        })?;

        Ok(DeviceStatus::from_raw(raw))
    }

    /// Get and clear the last error code (0 means no error)
    pub async fn last_error(&mut self) -> Result<i64> {
        let result = self.query(mnemonics::ERROR).await?;
        Ok(parse::integer(&result.response)?)
    }

    // Helper methods

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
}

impl Drop for Monochromator {
    fn drop(&mut self) {
        if self.session.is_connected() || self.transport.is_open() {
            warn!("Monochromator dropped while connected, closing {}", self.transport.endpoint());

            if let Err(e) = self.disconnect() {
                warn!("Failed to close transport: {}", e);
            }
        }
    }
}
