//! Session bookkeeping for a monochromator connection
//!
//! A session tracks:
//! - Connection state (the driver's two-state machine)
//! - Frames written and lines read since the session opened

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport closed, no I/O allowed
    Disconnected,
    
    /// Transport open, commands and queries allowed
    Connected,
}

/// Counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeStats {
    /// Frames written to the transport
    pub writes: u64,
    
    /// Lines read from the transport
    pub reads: u64,
}

/// Session manager
///
/// Manages connection state and exchange counters.
/// Thread-safe and can be cloned cheaply (Arc internally), so an observer
/// clone keeps seeing the driver's state.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Frames written since the session opened
    writes: AtomicU64,
    
    /// Lines read since the session opened
    reads: AtomicU64,
    
    /// Current session state
    state: parking_lot::RwLock<SessionState>,
}

impl Session {
    /// Create a new disconnected session
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                writes: AtomicU64::new(0),
                reads: AtomicU64::new(0),
                state: parking_lot::RwLock::new(SessionState::Disconnected),
            }),
        }
    }
    
    /// Get current state
    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }
    
    /// Check if connected
    pub fn is_connected(&self) -> bool {
        matches!(self.state(), SessionState::Connected)
    }
    
    /// Mark the session connected and reset counters
    ///
    /// Returns the previous state.
    pub fn open(&self) -> SessionState {
        let mut state = self.inner.state.write();
        let previous = *state;
        
        if previous == SessionState::Disconnected {
            self.inner.writes.store(0, Ordering::Release);
            self.inner.reads.store(0, Ordering::Release);
        }
        
        *state = SessionState::Connected;
        previous
    }
    
    /// Close session
    ///
    /// Returns the previous state. Counters are kept for inspection.
    pub fn close(&self) -> SessionState {
        let mut state = self.inner.state.write();
        let previous = *state;
        *state = SessionState::Disconnected;
        previous
    }
    
    /// Count one frame written
    pub fn record_write(&self) {
        self.inner.writes.fetch_add(1, Ordering::AcqRel);
    }
    
    /// Count one line read
    pub fn record_read(&self) {
        self.inner.reads.fetch_add(1, Ordering::AcqRel);
    }
    
    /// Snapshot of the exchange counters
    pub fn stats(&self) -> ExchangeStats {
        ExchangeStats {
            writes: self.inner.writes.load(Ordering::Acquire),
            reads: self.inner.reads.load(Ordering::Acquire),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    
    #[test]
    fn test_session_new() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(!session.is_connected());
        assert_eq!(session.stats(), ExchangeStats::default());
    }
    
    #[test]
    fn test_session_open_close() {
        let session = Session::new();
        
        assert_eq!(session.open(), SessionState::Disconnected);
        assert!(session.is_connected());
        
        assert_eq!(session.close(), SessionState::Connected);
        assert!(!session.is_connected());
    }
    
    #[test]
    fn test_session_open_twice_keeps_counters() {
        let session = Session::new();
        session.open();
        session.record_write();
        
        assert_eq!(session.open(), SessionState::Connected);
        assert_eq!(session.stats().writes, 1);
    }
    
    #[test]
    fn test_session_reopen_resets_counters() {
        let session = Session::new();
        session.open();
        session.record_write();
        session.record_read();
        session.record_read();
        
        session.close();
        assert_eq!(session.stats(), ExchangeStats { writes: 1, reads: 2 });
        
        session.open();
        assert_eq!(session.stats(), ExchangeStats::default());
    }
    
    #[test]
    fn test_session_clone() {
        let session1 = Session::new();
        let session2 = session1.clone();
        
        session1.open();
        session1.record_write();
        
        // Both share same state
        assert!(session2.is_connected());
        assert_eq!(session2.stats().writes, 1);
    }
}
