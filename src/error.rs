//! Unified error types for the demo service.

use thiserror::Error;

/// Unified error type for startup and serve failures.
///
/// Request-path errors never surface here: handler panics are converted to 500
/// responses by the terminal middleware, and the process keeps serving.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Metrics recorder installation error.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// IO error (listener bind, serve loop).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
