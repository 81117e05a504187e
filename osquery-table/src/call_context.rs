//! Per-call context handed to row generators.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Carries the caller's cancellation signal into a row generator.
///
/// The table plugin never acts on the flag itself; it is forwarded unchanged
/// so long-running generators can stop early, e.g. when osquery asks the
/// extension to shut down.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    cancelled: Option<Arc<AtomicBool>>,
}

impl CallContext {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_cancel_flag(flag: Arc<AtomicBool>) -> Self {
        Self {
            cancelled: Some(flag),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }
}
