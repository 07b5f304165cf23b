use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use strum_macros::Display;

/// Lifecycle shared by both tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TestState {
    Idle,
    Armed,
    Active,
    Completed,
    Aborted,
}

/// Cooperative stop flag handed to whoever feeds a recording.
///
/// Producers check `is_cancelled` before delivering more input; cancelling never
/// discards what was already delivered.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
