//! LCBRIDGE Core - Shared Types
//!
//! Data types and contracts shared by every crate in the workspace:
//! - `LcEvent`: the decoded event handed over by a reader
//! - `LcEventWrapper` / `LcEventWrapperStatus`: what gets published per cycle
//! - `StorePath`: validated keys of the transient event store
//! - `RunController`: the host's run-stop contract
//! - error enums and configuration

pub mod config;
pub mod control;
pub mod error;
pub mod event;
pub mod path;
pub mod wrapper;

pub use config::{BridgeConfig, LcioEventConfig, CONFIG_ENV_VAR};
pub use control::{RunController, StopRunError};
pub use error::{
    AlgorithmError, BridgeError, BridgeResult, ConfigError, EventError, ReaderError, StoreError,
};
pub use event::{AccessMode, LcCollection, LcEvent};
pub use path::{StorePath, EVENT_ROOT, LC_EVENT_PATH, LC_EVENT_STATUS_PATH};
pub use wrapper::{DataObject, LcEventWrapper, LcEventWrapperStatus};
