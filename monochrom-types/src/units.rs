//! Wavelength units

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Units the device reports and accepts wavelengths in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Units {
    /// Nanometers
    Nanometers,
    
    /// Micrometers
    Micrometers,
    
    /// Wavenumbers (1/cm)
    Wavenumbers,
}

impl Units {
    /// Protocol code
    pub fn code(self) -> &'static str {
        match self {
            Self::Nanometers => "NM",
            Self::Micrometers => "UM",
            Self::Wavenumbers => "WN",
        }
    }
}

impl FromStr for Units {
    type Err = Error;
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NM" => Ok(Self::Nanometers),
            "UM" => Ok(Self::Micrometers),
            "WN" => Ok(Self::Wavenumbers),
            _ => Err(Error::UnknownUnits(s.to_string())),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
