//! Error types for bridge operations

use thiserror::Error;

/// Transient event store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Object already registered at {path}")]
    AlreadyRegistered { path: String },

    #[error("Invalid store path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Registration rejected at {path}: {reason}")]
    Rejected { path: String, reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Event reader errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Reader has not been opened")]
    NotOpen,

    #[error("No input files given to the reader")]
    NoInputFiles,

    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Malformed event in {path} at line {line}: {reason}")]
    Malformed {
        path: String,
        line: usize,
        reason: String,
    },
}

/// Errors raised by operations on a decoded event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Event {run}/{event} is read-only")]
    ReadOnly { run: i32, event: i32 },

    #[error("Collection {name} already exists")]
    DuplicateCollection { name: String },

    #[error("Collection {name} not found")]
    CollectionNotFound { name: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or LCBRIDGE_CONFIG)")]
    MissingConfigPath,

    #[error("Failed to read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Failed to parse config TOML: {reason}")]
    Parse { reason: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Algorithm lifecycle errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AlgorithmError {
    #[error("Algorithm {algorithm} failed to initialize: {reason}")]
    InitializationFailed { algorithm: String, reason: String },

    #[error("Algorithm {algorithm} executed before initialize")]
    NotInitialized { algorithm: String },
}

/// Master error type for all bridge errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Reader error: {0}")]
    Reader(#[from] ReaderError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Algorithm error: {0}")]
    Algorithm(#[from] AlgorithmError),
}

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

// =============================================================================
// TESTS
// =============================================================================
