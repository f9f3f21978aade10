//! Scripted transport for testing drivers without hardware
//!
//! [`MockTransport`] records every open, close, write and read. Each written
//! frame is handed to a [`Responder`], whose reply lines are queued for
//! subsequent reads. A read with nothing queued fails immediately with
//! [`Error::ReadTimeout`], the same error a silent device produces.
//!
//! `MockTransport` is a handle: clones share state, so a test can keep a
//! clone for inspection after moving the original into a driver.
//!
//! Only built for tests and with the `mock` feature.
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "mock")] {
//! use monochrom_transport::{MockTransport, SimulatedMonochromator};
//!
//! let mock = MockTransport::new().with_responder(SimulatedMonochromator::new());
//! let observer = mock.clone();
//! // hand `mock` to a driver, inspect `observer.written_lines()` afterwards
//! # drop(mock);
//! assert_eq!(observer.write_count(), 0);
//! # }
//! ```

use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{BufMut, BytesMut};
use parking_lot::Mutex;
use tracing::trace;

use monochrom_core::constants::{DEFAULT_READ_TIMEOUT, TERMINATOR};

use crate::{error::*, Transport};

/// Produces the device's reply lines for one received command line
///
/// `line` has its terminator removed. Returned lines must not carry one.
pub trait Responder: Send {
    fn respond(&mut self, line: &str) -> Vec<String>;
}

impl<F> Responder for F
where
    F: FnMut(&str) -> Vec<String> + Send,
{
    fn respond(&mut self, line: &str) -> Vec<String> {
        self(line)
    }
}

/// One recorded transport interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    Open,
    Close,
    Write(Vec<u8>),
    Read(Vec<u8>),
    ReadTimeout,
}

struct MockState {
    open: bool,
    fail_open: bool,
    fail_writes: bool,
    read_timeout: Duration,
    incoming: BytesMut,
    responder: Option<Box<dyn Responder>>,
    events: Vec<MockEvent>,
}

/// A mock [`Transport`] backed by a scripted responder
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a closed mock transport with no responder
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                open: false,
                fail_open: false,
                fail_writes: false,
                read_timeout: DEFAULT_READ_TIMEOUT,
                incoming: BytesMut::new(),
                responder: None,
                events: Vec::new(),
            })),
        }
    }
    
    /// Answer every written frame with `responder`
    pub fn with_responder(self, responder: impl Responder + 'static) -> Self {
        self.state.lock().responder = Some(Box::new(responder));
        self
    }
    
    /// Set the read timeout reported to the driver
    pub fn with_read_timeout(self, timeout: Duration) -> Self {
        self.state.lock().read_timeout = timeout;
        self
    }
    
    /// Make `open()` fail with an I/O error
    pub fn fail_open(&self, fail: bool) {
        self.state.lock().fail_open = fail;
    }
    
    /// Make `write_bytes()` fail with an I/O error
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }
    
    /// Queue one line (terminator appended) for reading
    pub fn queue_line(&self, line: &str) {
        let mut state = self.state.lock();
        state.incoming.put_slice(line.as_bytes());
        state.incoming.put_slice(TERMINATOR);
    }
    
    /// Queue raw bytes for reading
    pub fn queue_bytes(&self, bytes: &[u8]) {
        self.state.lock().incoming.put_slice(bytes);
    }
    
    /// All recorded interactions in order
    pub fn events(&self) -> Vec<MockEvent> {
        self.state.lock().events.clone()
    }
    
    /// Forget recorded interactions
    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }
    
    /// Raw bytes of every write
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|event| match event {
                MockEvent::Write(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }
    
    /// Every write decoded and stripped of its terminator
    pub fn written_lines(&self) -> Vec<String> {
        self.writes().iter().map(|data| strip_terminator(data)).collect()
    }
    
    pub fn write_count(&self) -> usize {
        self.count(|event| matches!(event, MockEvent::Write(_)))
    }
    
    /// Reads attempted, including those that timed out
    pub fn read_count(&self) -> usize {
        self.count(|event| matches!(event, MockEvent::Read(_) | MockEvent::ReadTimeout))
    }
    
    pub fn close_count(&self) -> usize {
        self.count(|event| matches!(event, MockEvent::Close))
    }
    
    /// Whether the transport is currently open
    pub fn opened(&self) -> bool {
        self.state.lock().open
    }
    
    /// Bytes queued but not yet read
    pub fn pending(&self) -> usize {
        self.state.lock().incoming.len()
    }
    
    fn count(&self, predicate: impl Fn(&MockEvent) -> bool) -> usize {
        self.state.lock().events.iter().filter(|event| predicate(event)).count()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockTransport")
            .field("open", &state.open)
            .field("pending", &state.incoming.len())
            .field("events", &state.events.len())
            .finish()
    }
}

fn strip_terminator(data: &[u8]) -> String {
    let data = data.strip_suffix(TERMINATOR).unwrap_or(data);
    String::from_utf8_lossy(data).into_owned()
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        
        if state.open {
            return Err(Error::AlreadyOpen);
        }
        if state.fail_open {
            return Err(Error::Io(io::Error::new(io::ErrorKind::NotFound, "mock port missing")));
        }
        
        state.open = true;
        state.events.push(MockEvent::Open);
        Ok(())
    }
    
    fn close(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        
        if state.open {
            state.open = false;
            state.events.push(MockEvent::Close);
        }
        Ok(())
    }
    
    fn is_open(&self) -> bool {
        self.state.lock().open
    }
    
    async fn write_bytes(&mut self, data: &[u8]) -> Result<usize> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        
        if !state.open {
            return Err(Error::NotConnected);
        }
        if state.fail_writes {
            return Err(Error::Io(io::Error::new(io::ErrorKind::BrokenPipe, "mock port vanished")));
        }
        
        state.events.push(MockEvent::Write(data.to_vec()));
        
        if let Some(responder) = state.responder.as_mut() {
            let line = strip_terminator(data);
            for reply in responder.respond(&line) {
                trace!("Mock reply: {:?}", reply);
                state.incoming.put_slice(reply.as_bytes());
                state.incoming.put_slice(TERMINATOR);
            }
        }
        
        Ok(data.len())
    }
    
    async fn read_until(&mut self, delimiter: &[u8], timeout: Duration) -> Result<BytesMut> {
        let mut state = self.state.lock();
        
        if !state.open {
            return Err(Error::NotConnected);
        }
        if delimiter.is_empty() {
            return Err(Error::EmptyDelimiter);
        }
        
        let end = state
            .incoming
            .windows(delimiter.len())
            .position(|window| window == delimiter);
        
        match end {
            Some(pos) => {
                let line = state.incoming.split_to(pos + delimiter.len());
                state.events.push(MockEvent::Read(line.to_vec()));
                Ok(line)
            }
            None => {
                state.events.push(MockEvent::ReadTimeout);
                Err(Error::ReadTimeout { timeout })
            }
        }
    }
    
    fn read_timeout(&self) -> Duration {
        self.state.lock().read_timeout
    }
    
    fn endpoint(&self) -> String {
        "mock".to_string()
    }
}

/// In-memory monochromator that answers like the real device
///
/// Every received line is echoed. Queries (lines ending in `?`) are then
/// answered with the current value; set commands update state. An unknown
/// command sets error code 1, an unknown query gets the echo only.
#[derive(Debug, Clone)]
pub struct SimulatedMonochromator {
    info: String,
    wavelength: f64,
    wavelength_offset: f64,
    gratings: Vec<(u32, String)>,
    grating: usize,
    shutter_closed: bool,
    output_port: i64,
    slits: [i64; 3],
    units: String,
    filter: i64,
    last_error: i64,
}

impl SimulatedMonochromator {
    /// Error code for an unrecognized or malformed command
    pub const ERROR_BAD_COMMAND: i64 = 1;
    
    /// Status bit set while an error code is pending
    pub const STATUS_ERROR_BIT: i64 = 1 << 5;
    
    pub fn new() -> Self {
        Self {
            info: "SIMULATED MONOCHROMATOR V1.0".to_string(),
            wavelength: 0.0,
            wavelength_offset: 0.0,
            gratings: vec![
                (1200, "UV".to_string()),
                (600, "VIS".to_string()),
                (300, "IR".to_string()),
            ],
            grating: 1,
            shutter_closed: true,
            output_port: 1,
            slits: [10, 10, 10],
            units: "NM".to_string(),
            filter: 1,
            last_error: 0,
        }
    }
    
    /// Mechanical positioning error added to every move
    pub fn with_wavelength_offset(mut self, offset: f64) -> Self {
        self.wavelength_offset = offset;
        self
    }
    
    /// Identification string returned by `INFO?`
    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }
    
    fn query(&mut self, name: &str) -> Option<String> {
        let value = match name {
            "INFO" => self.info.clone(),
            "WAVE" => format!("{:.3}", self.wavelength),
            "GRAT" => {
                let (lines, label) = &self.gratings[self.grating - 1];
                format!("{},{},{}", self.grating, lines, label)
            }
            "SHUTTER" => {
                let code = if self.shutter_closed { "C" } else { "O" };
                code.to_string()
            }
            "OUTPORT" => self.output_port.to_string(),
            "UNITS" => self.units.clone(),
            "FILTER" => self.filter.to_string(),
            "STEP" => ((self.wavelength * 100.0).round() as i64).to_string(),
            "STB" => {
                let stb = if self.last_error != 0 { Self::STATUS_ERROR_BIT } else { 0 };
                stb.to_string()
            }
            "ERROR" => std::mem::take(&mut self.last_error).to_string(),
            _ => {
                let slit = slit_index(name)?;
                self.slits[slit].to_string()
            }
        };
        Some(value)
    }
    
    fn set(&mut self, name: &str, arg: Option<&str>) -> Option<()> {
        match name {
            "ABORT" => {}
            "GOWAVE" => self.wavelength = arg?.parse::<f64>().ok()? + self.wavelength_offset,
            "GRAT" => {
                let n = arg?.parse::<usize>().ok()?;
                if n == 0 || n > self.gratings.len() {
                    return None;
                }
                self.grating = n;
            }
            "SHUTTER" => match arg? {
                "C" => self.shutter_closed = true,
                "O" => self.shutter_closed = false,
                _ => return None,
            },
            "OUTPORT" => self.output_port = arg?.parse().ok()?,
            "UNITS" => match arg? {
                units @ ("NM" | "UM" | "WN") => self.units = units.to_string(),
                _ => return None,
            },
            "FILTER" => self.filter = arg?.parse().ok()?,
            _ => {
                let slit = slit_index(name)?;
                self.slits[slit] = arg?.parse().ok()?;
            }
        }
        Some(())
    }
}

impl Default for SimulatedMonochromator {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder for SimulatedMonochromator {
    fn respond(&mut self, line: &str) -> Vec<String> {
        let mut replies = vec![line.to_string()];
        let upper = line.trim().to_ascii_uppercase();
        
        if let Some(name) = upper.strip_suffix('?') {
            match self.query(name) {
                Some(value) => replies.push(value),
                None => self.last_error = Self::ERROR_BAD_COMMAND,
            }
            return replies;
        }
        
        let mut parts = upper.split_whitespace();
        let name = parts.next().unwrap_or_default();
        if self.set(name, parts.next()).is_none() {
            self.last_error = Self::ERROR_BAD_COMMAND;
        }
        
        replies
    }
}

/// Zero-based slit index from a `SLIT<n>MICRONS` mnemonic
fn slit_index(name: &str) -> Option<usize> {
    let id: usize = name.strip_prefix("SLIT")?.strip_suffix("MICRONS")?.parse().ok()?;
    (1..=3).contains(&id).then(|| id - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    
    #[tokio::test]
    async fn test_mock_requires_open() {
        let mut mock = MockTransport::new();
        
        assert!(matches!(mock.write_bytes(b"X\r\n").await, Err(Error::NotConnected)));
        assert!(mock.events().is_empty());
    }
    
    #[tokio::test]
    async fn test_mock_queued_lines() {
        let mut mock = MockTransport::new();
        mock.open().await.unwrap();
        mock.queue_line("HELLO");
        
        let line = mock.read_until(TERMINATOR, Duration::from_secs(1)).await.unwrap();
        assert_eq!(&line[..], b"HELLO\r\n");
        
        let result = mock.read_until(TERMINATOR, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(Error::ReadTimeout { .. })));
        assert_eq!(mock.read_count(), 2);
    }
    
    #[tokio::test]
    async fn test_mock_close_is_idempotent() {
        let mut mock = MockTransport::new();
        let observer = mock.clone();
        
        mock.open().await.unwrap();
        mock.close().unwrap();
        mock.close().unwrap();
        
        assert_eq!(observer.close_count(), 1);
        assert!(!observer.opened());
    }
    
    #[test]
    fn test_simulator_echoes_and_answers_queries() {
        let mut sim = SimulatedMonochromator::new();
        
        assert_eq!(sim.respond("GOWAVE 532.100"), vec!["GOWAVE 532.100"]);
        assert_eq!(sim.respond("WAVE?"), vec!["WAVE?", "532.100"]);
        assert_eq!(sim.respond("GRAT?"), vec!["GRAT?", "1,1200,UV"]);
    }
    
    #[test]
    fn test_simulator_slits() {
        let mut sim = SimulatedMonochromator::new();
        
        sim.respond("SLIT2MICRONS 150");
        assert_eq!(sim.respond("SLIT2MICRONS?"), vec!["SLIT2MICRONS?", "150"]);
        assert_eq!(sim.respond("SLIT1MICRONS?"), vec!["SLIT1MICRONS?", "10"]);
    }
    
    #[test]
    fn test_simulator_error_code() {
        let mut sim = SimulatedMonochromator::new();
        
        sim.respond("GRAT 9");
        assert_eq!(sim.respond("STB?")[1], "32");
        assert_eq!(sim.respond("ERROR?")[1], "1");
        assert_eq!(sim.respond("ERROR?")[1], "0");
    }
    
    #[test]
    fn test_simulator_unknown_query_gets_echo_only() {
        let mut sim = SimulatedMonochromator::new();
        assert_eq!(sim.respond("BOGUS?"), vec!["BOGUS?"]);
    }
    
    #[test]
    fn test_slit_index() {
        assert_eq!(slit_index("SLIT1MICRONS"), Some(0));
        assert_eq!(slit_index("SLIT3MICRONS"), Some(2));
        assert_eq!(slit_index("SLIT4MICRONS"), None);
        assert_eq!(slit_index("SLITMICRONS"), None);
    }
}
