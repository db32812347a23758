//! LCBRIDGE Algo - LCIO Event Algorithm and Host Run Loop
//!
//! This crate holds the adapter that moves events from an external reader
//! into the transient event store, together with the minimal host it runs
//! in.
//!
//! # Cycle
//!
//! ```text
//! ApplicationManager ──execute──▶ LcioEventAlgo ──read_next_event──▶ EventReader
//!        │                              │
//!        │                              ├─▶ /Event/LCEvent        (LcEventWrapper)
//!        │                              └─▶ /Event/LCEventStatus  (LcEventWrapperStatus)
//!        │
//!        ◀──────────── stop_run (end of stream only) ───────────────┘
//! ```
//!
//! # Key Types
//!
//! - `LcioEventAlgo`: the adapter
//! - `ApplicationManager`: runs algorithms cycle by cycle until stopped
//! - `RunControl`: the manager's `RunController`
//! - `current_event`: presence-flag-checked access for downstream algorithms

mod algorithm;
mod app;
mod consumer;
mod control;
pub mod fatal;
mod lcio_event;
pub mod telemetry;

pub use algorithm::{Algorithm, EventContext};
pub use app::{ApplicationManager, RunSummary};
pub use consumer::{current_event, current_event_mut, has_current_event, EventSummary, SummaryStats};
pub use control::RunControl;
pub use lcio_event::{LcioEventAlgo, ReadState, LCIO_EVENT_ALGO_NAME, RUN_CONTROLLER_SERVICE};
