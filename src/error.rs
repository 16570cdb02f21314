use std::io;
use thiserror::Error;

/// Error type for the poptop library
#[derive(Error, Debug)]
pub enum PoptopError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid series capacity {0}: at least one sample must be retained")]
    InvalidCapacity(usize),

    #[error("Invalid smoothing window {0}: at least one sample must be averaged")]
    InvalidWindow(usize),

    #[error("No widgets selected, nothing to lay out")]
    NoWidgets,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metric collection failed: {0}")]
    MetricSource(String),
}

/// Result type alias for the poptop library
pub type Result<T> = std::result::Result<T, PoptopError>;

impl PoptopError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PoptopError::Config(msg.into())
    }

    pub fn metric_source<S: Into<String>>(msg: S) -> Self {
        PoptopError::MetricSource(msg.into())
    }
}
