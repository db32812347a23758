//! Algorithm lifecycle contract of the host run loop.

use lcbridge_core::BridgeResult;
use std::fmt;

/// Per-cycle context handed to every algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventContext {
    cycle: u64,
}

impl EventContext {
    pub fn new(cycle: u64) -> Self {
        Self { cycle }
    }

    /// Zero-based number of the processing cycle.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}

/// A unit of work scheduled once per cycle by the host.
///
/// Collaborators such as the event store are injected at construction, so
/// the lifecycle methods take nothing but the cycle context.
pub trait Algorithm: Send + fmt::Debug {
    fn name(&self) -> &str;

    /// Called once before the first cycle.
    fn initialize(&mut self) -> BridgeResult<()>;

    /// Called once per cycle. An error fails the cycle and ends the run.
    fn execute(&mut self, ctx: &EventContext) -> BridgeResult<()>;

    /// Called once after the last cycle.
    fn finalize(&mut self) -> BridgeResult<()> {
        Ok(())
    }
}
