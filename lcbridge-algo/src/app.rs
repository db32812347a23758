//! Minimal host run loop.
//!
//! The [`ApplicationManager`] owns the transient store handle, the run
//! controller and an ordered list of algorithms. Each cycle every algorithm
//! is executed in order and the store is cleared afterwards. The loop ends
//! once a stop was requested (the cycle in progress still completes) or the
//! optional cycle limit is reached.

use crate::{Algorithm, EventContext, RunControl};
use lcbridge_core::{BridgeResult, RunController};
use lcbridge_store::EventStore;
use std::sync::{Arc, Weak};

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles fully executed.
    pub cycles: u64,
    /// Whether the run ended on a stop request rather than the cycle limit.
    pub stopped_by_request: bool,
}

/// Host of the processing loop.
#[derive(Debug)]
pub struct ApplicationManager {
    store: Arc<dyn EventStore>,
    control: Arc<RunControl>,
    algorithms: Vec<Box<dyn Algorithm>>,
    max_cycles: Option<u64>,
}

impl ApplicationManager {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            control: Arc::new(RunControl::new()),
            algorithms: Vec::new(),
            max_cycles: None,
        }
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn store(&self) -> Arc<dyn EventStore> {
        Arc::clone(&self.store)
    }

    /// Handle for algorithms that need to stop the run. Upgrading fails once
    /// the manager is dropped.
    pub fn run_controller(&self) -> Weak<dyn RunController> {
        let controller: Arc<dyn RunController> = self.control.clone();
        Arc::downgrade(&controller)
    }

    pub fn control(&self) -> &RunControl {
        &self.control
    }

    /// Append an algorithm. Algorithms execute in insertion order.
    pub fn add_algorithm(&mut self, algorithm: Box<dyn Algorithm>) {
        self.algorithms.push(algorithm);
    }

    /// Initialize, loop, finalize.
    ///
    /// A failing cycle ends the loop; algorithms are still finalized and the
    /// cycle error is returned. If an algorithm fails to initialize, only the
    /// algorithms before it are finalized and no cycle runs.
    pub fn run(&mut self) -> BridgeResult<RunSummary> {
        self.control.reset();

        self.initialize_all()?;
        tracing::info!(algorithms = self.algorithms.len(), "Starting event loop");

        let mut cycles = 0;
        let outcome = loop {
            if self.control.is_stop_requested() {
                break Ok(true);
            }
            if self.max_cycles.is_some_and(|max| cycles >= max) {
                break Ok(false);
            }
            if let Err(e) = self.execute_cycle(&EventContext::new(cycles)) {
                tracing::error!(cycle = cycles, error = %e, "Cycle failed, ending run");
                break Err(e);
            }
            cycles += 1;
        };

        let finalized = self.finalize_all();
        let stopped_by_request = outcome?;
        finalized?;

        tracing::info!(cycles, stopped_by_request, "Event loop finished");
        Ok(RunSummary {
            cycles,
            stopped_by_request,
        })
    }

    fn execute_cycle(&mut self, ctx: &EventContext) -> BridgeResult<()> {
        let _span = tracing::debug_span!("cycle", number = ctx.cycle()).entered();

        let executed = self
            .algorithms
            .iter_mut()
            .try_for_each(|algorithm| algorithm.execute(ctx));
        let cleared = self.store.clear();

        executed?;
        cleared?;
        Ok(())
    }

    /// Initialize algorithms in order. On failure the ones already
    /// initialized are finalized and the initialize error is returned.
    fn initialize_all(&mut self) -> BridgeResult<()> {
        for index in 0..self.algorithms.len() {
            let algorithm = &mut self.algorithms[index];
            tracing::debug!(algorithm = algorithm.name(), "Initializing algorithm");
            if let Err(e) = algorithm.initialize() {
                tracing::error!(algorithm = algorithm.name(), error = %e, "Initialize failed");
                let _ = self.finalize_prefix(index);
                return Err(e);
            }
        }
        Ok(())
    }

    fn finalize_all(&mut self) -> BridgeResult<()> {
        self.finalize_prefix(self.algorithms.len())
    }

    /// Finalize the first `count` algorithms, returning the first failure.
    fn finalize_prefix(&mut self, count: usize) -> BridgeResult<()> {
        let mut first_error = None;
        for algorithm in self.algorithms.iter_mut().take(count) {
            if let Err(e) = algorithm.finalize() {
                tracing::error!(algorithm = algorithm.name(), error = %e, "Finalize failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
