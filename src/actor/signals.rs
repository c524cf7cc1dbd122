//! Coordination signals shared by both workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Flags {
    exit: AtomicBool,
    resizing: AtomicBool,
}

/// The two latched booleans crossing the worker boundary.
///
/// Writes use `Release` and reads use `Acquire`, so anything a worker did
/// before raising a flag is visible to the worker that observes it. Clones
/// share the same flags.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    flags: Arc<Flags>,
}

impl Signals {
    /// Both flags cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask both workers to stop. Never cleared once set.
    pub fn request_exit(&self) {
        self.flags.exit.store(true, Ordering::Release);
    }

    /// Whether shutdown was requested.
    pub fn exit_requested(&self) -> bool {
        self.flags.exit.load(Ordering::Acquire)
    }

    /// Raise or clear the resizing flag.
    pub fn set_resizing(&self, resizing: bool) {
        self.flags.resizing.store(resizing, Ordering::Release);
    }

    /// Whether the terminal is being resized.
    pub fn is_resizing(&self) -> bool {
        self.flags.resizing.load(Ordering::Acquire)
    }
}

/// Raises the exit flag when dropped.
///
/// Held by a worker for its whole run so that an early return or a panic
/// still releases the other worker.
#[derive(Debug)]
pub struct ExitOnDrop {
    signals: Signals,
}

impl ExitOnDrop {
    /// Guard `signals`.
    pub const fn new(signals: Signals) -> Self {
        Self { signals }
    }
}

impl Drop for ExitOnDrop {
    fn drop(&mut self) {
        self.signals.request_exit();
    }
}
