//! Run controller of the host loop.

use lcbridge_core::{RunController, StopRunError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// [`RunController`] owned by the [`crate::ApplicationManager`].
#[derive(Debug, Default)]
pub struct RunControl {
    stop_requested: AtomicBool,
    stop_requests: AtomicU64,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop requests received during the current run.
    pub fn stop_requests(&self) -> u64 {
        self.stop_requests.load(Ordering::SeqCst)
    }

    /// Forget stop requests of a previous run.
    pub(crate) fn reset(&self) {
        self.stop_requested.store(false, Ordering::SeqCst);
        self.stop_requests.store(0, Ordering::SeqCst);
    }
}

impl RunController for RunControl {
    fn stop_run(&self) -> Result<(), StopRunError> {
        let previous = self.stop_requests.fetch_add(1, Ordering::SeqCst);
        self.stop_requested.store(true, Ordering::SeqCst);
        if previous == 0 {
            tracing::info!("Run stop requested");
        } else {
            tracing::debug!(requests = previous + 1, "Run stop requested again");
        }
        Ok(())
    }

    fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }
}
