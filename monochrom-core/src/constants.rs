//! Protocol constants

use std::time::Duration;

/// Line terminator appended to every outgoing frame and expected on every
/// incoming line.
pub const TERMINATOR: &[u8] = b"\r\n";

/// Suffix that turns a bare command name into a query.
pub const QUERY_SUFFIX: char = '?';

/// Default read timeout for one response line
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Default connection timeout for network-attached ports
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default serial baud rate
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Upper bound on buffered bytes while waiting for a terminator
pub const MAX_LINE_LENGTH: usize = 4096;

/// Command mnemonics understood by the device
pub mod mnemonics {
    /// Identification string
    pub const INFO: &str = "INFO";

    /// Current wavelength
    pub const WAVE: &str = "WAVE";

    /// Move to wavelength
    pub const GOWAVE: &str = "GOWAVE";

    /// Stop any motion in progress
    pub const ABORT: &str = "ABORT";

    /// Grating selection
    pub const GRAT: &str = "GRAT";

    /// Shutter open/close
    pub const SHUTTER: &str = "SHUTTER";

    /// Output port selection
    pub const OUTPORT: &str = "OUTPORT";

    /// Wavelength units
    pub const UNITS: &str = "UNITS";

    /// Filter wheel position
    pub const FILTER: &str = "FILTER";

    /// Grating motor step position
    pub const STEP: &str = "STEP";

    /// Status byte
    pub const STB: &str = "STB";

    /// Last error code
    pub const ERROR: &str = "ERROR";

    /// Slit width mnemonic for slit `id`, e.g. `SLIT1MICRONS`.
    pub fn slit_microns(id: u8) -> String {
        format!("SLIT{}MICRONS", id)
    }
}
