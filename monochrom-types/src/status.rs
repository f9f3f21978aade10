//! Device status byte

use bitflags::bitflags;

bitflags! {
    /// Status byte returned by the `STB?` query
    ///
    /// Unknown bits are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceStatus: u8 {
        /// The last command was not accepted
        const COMMAND_ERROR = 1 << 5;
    }
}

impl DeviceStatus {
    /// Build from the raw status value
    pub fn from_raw(raw: u8) -> Self {
        Self::from_bits_retain(raw)
    }
    
    pub fn has_error(self) -> bool {
        self.contains(Self::COMMAND_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_status_error_bit() {
        assert!(DeviceStatus::from_raw(0x20).has_error());
        assert!(!DeviceStatus::from_raw(0x00).has_error());
    }
    
    #[test]
    fn test_status_keeps_unknown_bits() {
        assert_eq!(DeviceStatus::from_raw(0x24).bits(), 0x24);
    }
}
