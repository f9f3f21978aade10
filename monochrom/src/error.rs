//! High-level error types

use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Device not connected")]
    NotConnected,
    
    #[error("Transport error: {0}")]
    Transport(monochrom_transport::Error),
    
    #[error("No response line within {timeout:?}")]
    Timeout {
        timeout: Duration,
    },
    
    #[error("Encoding error: {0}")]
    Encoding(#[from] monochrom_core::Error),
    
    #[error("Unexpected response: {0}")]
    Parse(#[from] monochrom_types::Error),
}

impl From<monochrom_transport::Error> for Error {
    fn from(err: monochrom_transport::Error) -> Self {
        match err {
            monochrom_transport::Error::ReadTimeout { timeout } => Self::Timeout { timeout },
            monochrom_transport::Error::NotConnected => Self::NotConnected,
            other => Self::Transport(other),
        }
    }
}

impl Error {
    /// Check if the device simply did not answer in time
    ///
    /// A timeout during a query leaves unread lines in flight; whether to
    /// poll again or give up on the session is the caller's decision.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
    
    /// Check if error requires reconnection
    pub fn requires_reconnect(&self) -> bool {
        matches!(self, Self::NotConnected | Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_read_timeout_maps_to_timeout() {
        let err: Error = monochrom_transport::Error::ReadTimeout {
            timeout: Duration::from_secs(5),
        }
        .into();
        
        assert!(err.is_timeout());
        assert!(!err.requires_reconnect());
    }
    
    #[test]
    fn test_transport_not_connected_maps_to_not_connected() {
        let err: Error = monochrom_transport::Error::NotConnected.into();
        assert!(matches!(err, Error::NotConnected));
    }
    
    #[test]
    fn test_io_error_stays_transport() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = monochrom_transport::Error::Io(io).into();
        
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.requires_reconnect());
    }
}
