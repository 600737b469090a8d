//! Error types for Wireplan core.

use std::path::PathBuf;
use thiserror::Error;

use wireplan_engine::engine::GridError;

/// Errors that can occur in the Wireplan document layer
#[derive(Error, Debug)]
pub enum WireplanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Could not save mappings to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not load mappings from {path}: {message}")]
    MalformedMappings { path: PathBuf, message: String },

    #[error("Sheet row {row}: {message}")]
    Sheet { row: usize, message: String },

    #[error("No empty result cell up to row {0}")]
    NoOpenRow(usize),

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, WireplanError>;
