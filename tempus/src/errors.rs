use std::path::PathBuf;
use tempus_api::core::input::ParseUpdateError;

#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("IO operation failed")]
    IOError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to open update file {path}")]
    UpdateFileError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Batch columns have different lengths: {sources} sources, {destinations} destinations, {times} timestamps")]
    ColumnLengthMismatch {
        sources: usize,
        destinations: usize,
        times: usize,
    },

    #[error("Invalid update on line {line}")]
    InvalidUpdate {
        line: usize,
        source: ParseUpdateError,
    },

    #[error("Failed to build thread pool")]
    ThreadPoolError {
        #[from]
        source: rayon::ThreadPoolBuildError,
    },

    #[error("Failed to load config")]
    ConfigError {
        #[from]
        source: config::ConfigError,
    },
}
