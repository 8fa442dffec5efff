// Mon Oct 19 2026 - Alex

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Receives progress of a running search and decides whether it goes on.
/// Shared by the extraction workers, so every method takes `&self`.
pub trait ProgressMonitor: Send + Sync {
    fn begin(&self, _task: &str, _total: usize) {}

    fn sub_task(&self, _name: &str) {}

    fn worked(&self, _units: usize) {}

    fn is_cancelled(&self) -> bool {
        false
    }

    fn done(&self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressMonitor;

impl ProgressMonitor for NullProgressMonitor {}

/// A cancellation flag that can be handed to another thread.
#[derive(Debug, Default, Clone)]
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

/// Counts work and optionally cancels itself after a number of units.
#[derive(Debug, Default)]
pub struct CountingMonitor {
    token: CancellationToken,
    total: AtomicUsize,
    worked: AtomicUsize,
    cancel_after: Option<usize>,
}

impl CountingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }

    pub fn cancel_after(mut self, units: usize) -> Self {
        self.cancel_after = Some(units);
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn worked_units(&self) -> usize {
        self.worked.load(Ordering::SeqCst)
    }
}

impl ProgressMonitor for CountingMonitor {
    fn begin(&self, _task: &str, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    fn worked(&self, units: usize) {
        let worked = self.worked.fetch_add(units, Ordering::SeqCst) + units;
        if let Some(limit) = self.cancel_after {
            if worked >= limit {
                self.token.cancel();
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
