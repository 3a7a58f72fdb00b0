//! Best-effort progress diagnostics.
//!
//! Events arrive from many workers at once. Their interleaving is not
//! specified and changes from run to run, so nothing may depend on it.

use std::fmt;

/// Index of a worker inside a [`Team`](super::team::Team), `0..team.size()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receives one event per finished work item (a matrix row, a vector
/// element, a section).
pub trait Progress: Sync {
    fn completed(&self, worker: WorkerId, index: usize);
}

/// Discards every event.
impl Progress for () {
    fn completed(&self, _worker: WorkerId, _index: usize) {}
}

/// Forwards events to the `log` facade at trace level.
#[derive(Debug, Clone, Copy)]
pub struct LogProgress {
    pub label: &'static str,
}

impl LogProgress {
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl Progress for LogProgress {
    fn completed(&self, worker: WorkerId, index: usize) {
        log::trace!("Thread {}: {}[{}] done", worker, self.label, index);
    }
}
