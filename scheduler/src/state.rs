//! Single-flight state for the scan loop.

use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
}

/// Admits one scan at a time.
#[derive(Debug, Default)]
pub struct ScanGate {
    state: Mutex<ScanState>,
}

impl ScanGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Moves `Idle -> Scanning` and returns a guard that moves back on drop.
    /// Returns `None` when a scan is already running.
    pub fn try_begin(self: &Arc<Self>) -> Option<ScanGuard> {
        let mut state = self.state.lock();
        if *state == ScanState::Scanning {
            return None;
        }
        *state = ScanState::Scanning;

        Some(ScanGuard {
            gate: Arc::clone(self),
        })
    }

    pub fn current(&self) -> ScanState {
        *self.state.lock()
    }
}

/// Held for the duration of one scan.
#[derive(Debug)]
pub struct ScanGuard {
    gate: Arc<ScanGate>,
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        *self.gate.state.lock() = ScanState::Idle;
    }
}
