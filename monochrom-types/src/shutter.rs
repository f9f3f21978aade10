//! Shutter state

use std::fmt;

/// Shutter position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shutter {
    Open,
    Closed,
}

impl Shutter {
    /// Interpret a shutter query response
    ///
    /// Only an exact `C` means closed. Anything else, including an
    /// empty line, is treated as open.
    pub fn from_response(response: &str) -> Self {
        if response == "C" {
            Self::Closed
        } else {
            Self::Open
        }
    }
    
    /// Build from a "close the shutter" flag
    pub fn from_closed(closed: bool) -> Self {
        if closed { Self::Closed } else { Self::Open }
    }
    
    /// Argument sent with the shutter command
    pub fn code(self) -> &'static str {
        match self {
            Self::Open => "O",
            Self::Closed => "C",
        }
    }
    
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for Shutter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_only_exact_c_is_closed() {
        assert_eq!(Shutter::from_response("C"), Shutter::Closed);
        assert_eq!(Shutter::from_response("O"), Shutter::Open);
        assert_eq!(Shutter::from_response(""), Shutter::Open);
        assert_eq!(Shutter::from_response("c"), Shutter::Open);
        assert_eq!(Shutter::from_response("C "), Shutter::Open);
    }
    
    #[test]
    fn test_codes() {
        assert_eq!(Shutter::from_closed(true).code(), "C");
        assert_eq!(Shutter::from_closed(false).code(), "O");
    }
}
