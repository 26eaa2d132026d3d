//! Shared flags linking the HTTP control surface to the capture loop.
//!
//! The two sides communicate through single atomic booleans only: the server
//! writes, the loop reads at each iteration boundary. A stale read costs at
//! most one poll interval, so no locking is involved anywhere on this path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether the capture loop is actively evaluating chunks.
///
/// Starts inactive. `start`/`stop` are idempotent and report whether the call
/// actually flipped the flag so the control surface can phrase its reply.
#[derive(Clone, Debug, Default)]
pub struct RecordingState {
    active: Arc<AtomicBool>,
}

impl RecordingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate recording. Returns false if it was already active.
    pub fn start(&self) -> bool {
        !self.active.swap(true, Ordering::Relaxed)
    }

    /// Deactivate recording. Returns false if it was already inactive.
    pub fn stop(&self) -> bool {
        self.active.swap(false, Ordering::Relaxed)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

/// One-way process-shutdown signal observed by the capture loop.
#[derive(Clone, Debug, Default)]
pub struct ShutdownFlag {
    triggered: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Relaxed)
    }
}
