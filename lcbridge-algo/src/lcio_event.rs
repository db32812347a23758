//! Algorithm publishing one reader event per cycle into the event store.
//!
//! Each cycle the algorithm pulls the next event from its [`EventReader`] and
//! publishes, under fixed keys of the transient store:
//!
//! - `/Event/LCEvent`: an [`LcEventWrapper`] owning the event
//! - `/Event/LCEventStatus`: an [`LcEventWrapperStatus`] saying whether the
//!   cycle has an event
//!
//! When the reader runs dry it publishes a `false` flag and asks the run
//! controller to stop the run.

use crate::{fatal, Algorithm, EventContext};
use lcbridge_core::{
    AccessMode, AlgorithmError, BridgeError, BridgeResult, LcEvent, LcEventWrapper,
    LcEventWrapperStatus, LcioEventConfig, RunController, StorePath,
};
use lcbridge_reader::EventReader;
use lcbridge_store::EventStore;
use std::fmt;
use std::sync::{Arc, Weak};

/// Default algorithm name.
pub const LCIO_EVENT_ALGO_NAME: &str = "LcioEvent";

/// Name under which the run controller is reported when it is missing.
pub const RUN_CONTROLLER_SERVICE: &str = "ApplicationMgr";

/// Reading state of the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// The reader may still produce events.
    Streaming,
    /// End of stream was observed. Terminal.
    Drained,
}

/// Bridges an [`EventReader`] into the transient event store.
pub struct LcioEventAlgo {
    name: String,
    config: LcioEventConfig,
    reader: Box<dyn EventReader>,
    store: Arc<dyn EventStore>,
    run_controller: Weak<dyn RunController>,
    state: ReadState,
    initialized: bool,
    pending_skip: u64,
    published: u64,
    stop_requested: bool,
}

impl LcioEventAlgo {
    pub fn new(
        config: LcioEventConfig,
        reader: Box<dyn EventReader>,
        store: Arc<dyn EventStore>,
        run_controller: Weak<dyn RunController>,
    ) -> Self {
        Self {
            name: LCIO_EVENT_ALGO_NAME.to_string(),
            config,
            reader,
            store,
            run_controller,
            state: ReadState::Streaming,
            initialized: false,
            pending_skip: 0,
            published: 0,
            stop_requested: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn state(&self) -> ReadState {
        self.state
    }

    /// Events published since initialize.
    pub fn events_published(&self) -> u64 {
        self.published
    }

    fn first_input(&self) -> String {
        self.config
            .input_files
            .first()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    fn next_event(&mut self) -> BridgeResult<Option<LcEvent>> {
        if let Some(max) = self.config.max_events {
            if self.published >= max {
                tracing::debug!(max_events = max, "Event limit reached");
                return Ok(None);
            }
        }

        if self.pending_skip > 0 {
            let wanted = std::mem::take(&mut self.pending_skip);
            let skipped = self.reader.skip_events(wanted).map_err(|e| {
                tracing::error!(error = %e, "Failed to skip leading events");
                e
            })?;
            tracing::info!(skipped, wanted, "Skipped leading events");
        }

        self.reader
            .read_next_event(AccessMode::Update)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to read the next LCEvent");
                BridgeError::from(e)
            })
    }

    fn publish_event(&mut self, ctx: &EventContext, event: LcEvent) -> BridgeResult<()> {
        let (run, number) = (event.run_number(), event.event_number());

        let wrapper = LcEventWrapper::new(event);
        if let Err(e) = self
            .store
            .register_object(&StorePath::lc_event(), Box::new(wrapper))
        {
            tracing::error!(error = %e, run, event = number, "Failed to store the LCEvent");
            return Err(e.into());
        }
        self.published += 1;

        let status = LcEventWrapperStatus::new(true);
        if let Err(e) = self
            .store
            .register_object(&StorePath::lc_event_status(), Box::new(status))
        {
            tracing::error!(
                error = %e,
                "Failed to store flag for underlying LCEvent: downstream algorithms may run over a non-existing event"
            );
            return Err(e.into());
        }

        tracing::info!(
            cycle = ctx.cycle(),
            run,
            event = number,
            file = %self.first_input(),
            "Reading from file"
        );
        Ok(())
    }

    fn publish_end_of_stream(&mut self, ctx: &EventContext) -> BridgeResult<()> {
        self.state = ReadState::Drained;

        let status = LcEventWrapperStatus::new(false);
        if let Err(e) = self
            .store
            .register_object(&StorePath::lc_event_status(), Box::new(status))
        {
            tracing::error!(
                error = %e,
                "Failed to store flag for underlying LCEvent: downstream algorithms may run over a non-existing event"
            );
            return Err(e.into());
        }

        if self.stop_requested {
            tracing::debug!(cycle = ctx.cycle(), "Run stop already requested");
            return Ok(());
        }

        tracing::info!(
            cycle = ctx.cycle(),
            events = self.published,
            "No more LCEvents, stopping the run"
        );
        self.request_stop();
        self.stop_requested = true;
        Ok(())
    }

    fn request_stop(&self) {
        match self.run_controller.upgrade() {
            Some(controller) => {
                if let Err(e) = controller.stop_run() {
                    tracing::warn!(error = %e, "Run controller did not accept the stop request");
                }
            }
            None => fatal::missing_service(RUN_CONTROLLER_SERVICE),
        }
    }
}

impl Algorithm for LcioEventAlgo {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) -> BridgeResult<()> {
        self.config.validate()?;
        self.reader
            .open(self.config.input_files.clone())
            .map_err(|e| AlgorithmError::InitializationFailed {
                algorithm: self.name.clone(),
                reason: e.to_string(),
            })?;

        self.state = ReadState::Streaming;
        self.pending_skip = self.config.skip_events;
        self.published = 0;
        self.stop_requested = false;
        self.initialized = true;

        tracing::info!(
            algorithm = %self.name,
            first_file = %self.first_input(),
            files = self.config.input_files.len(),
            "Initialized the LcioEvent algorithm"
        );
        Ok(())
    }

    fn execute(&mut self, ctx: &EventContext) -> BridgeResult<()> {
        if !self.initialized {
            return Err(AlgorithmError::NotInitialized {
                algorithm: self.name.clone(),
            }
            .into());
        }

        let event = match self.state {
            ReadState::Streaming => self.next_event()?,
            ReadState::Drained => {
                tracing::warn!(cycle = ctx.cycle(), "Executed after end of stream");
                None
            }
        };

        match event {
            Some(event) => self.publish_event(ctx, event),
            None => self.publish_end_of_stream(ctx),
        }
    }

    fn finalize(&mut self) -> BridgeResult<()> {
        self.reader.close()?;
        self.initialized = false;
        tracing::info!(
            algorithm = %self.name,
            events = self.published,
            "Finalized the LcioEvent algorithm"
        );
        Ok(())
    }
}

impl fmt::Debug for LcioEventAlgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LcioEventAlgo")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("published", &self.published)
            .finish_non_exhaustive()
    }
}
