use thiserror::Error;

/// Errors raised by the shared infrastructure helpers
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unusable configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// The global tracing subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result alias for infra-common operations
pub type Result<T> = std::result::Result<T, Error>;
