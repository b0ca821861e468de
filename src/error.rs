use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UptimeError {
    /// Malformed, empty or too short input. Aborts the run.
    #[error("input error: {0}")]
    Input(String),

    /// Unsupported period selector or option value.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("outage histogram error: {0}")]
    Histogram(String),
}

impl UptimeError {
    pub(crate) fn input(msg: impl Into<String>) -> Self {
        UptimeError::Input(msg.into())
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        UptimeError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, UptimeError>;
