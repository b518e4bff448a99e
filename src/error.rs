//! Error types for the bridge

use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BlazeError>;

/// Bridge errors
///
/// Failures inside the resolver callback are deliberately absent from this
/// enum: they degrade to a null pointer handed back to the engine, which
/// reports them as part of the eventual compile failure.
#[derive(Error, Debug)]
pub enum BlazeError {
    /// The native library could not be loaded or a required symbol is
    /// missing. The failure is recorded once and every later call reports
    /// it again; it is never retried.
    #[error("Native engine initialization failed: {0}")]
    Initialization(String),

    /// The native compiler returned its failure sentinel.
    #[error("Schema compilation failed")]
    Compilation,

    /// A native call could not be made or returned malformed data. Never
    /// used for a "schema says invalid" outcome.
    #[error("Native invocation failed: {0}")]
    Invocation(String),

    /// A compiled schema was used after `close()`.
    #[error("Compiled schema has been closed")]
    SchemaClosed,

    /// A compile was started on a thread that already has one in flight.
    #[error("Nested schema compilation on a single thread is not supported")]
    NestedCompile,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
