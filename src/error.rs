use chrono::NaiveDateTime;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that stop an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Cannot read log file {path:?}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No timestamps to bucket")]
    EmptyInput,

    #[error("Timestamp {current} at position {index} is earlier than {previous}")]
    OutOfOrder {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("Bucket interval must be greater than zero minutes")]
    InvalidInterval,

    #[error("Rolling window must cover at least one bucket")]
    InvalidWindow,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
