//! Run control contract between the host loop and its algorithms.

use std::fmt;
use thiserror::Error;

/// Failure reported by a run controller when a stop cannot be honoured.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Run controller refused to stop: {reason}")]
pub struct StopRunError {
    pub reason: String,
}

/// Host service that owns the processing loop.
///
/// A stop request is advisory: the host finishes the cycle in progress and
/// then leaves the loop.
pub trait RunController: Send + Sync + fmt::Debug {
    /// Ask the host to end the current run.
    fn stop_run(&self) -> Result<(), StopRunError>;

    /// Whether a stop has been requested for the current run.
    fn is_stop_requested(&self) -> bool;
}
