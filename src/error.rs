//! Error types for loading and exporting survey data.
//!
//! Only the outer edges fail: reading the source file, the CSV reader itself,
//! report export and configuration. Bad rows and bad values inside a readable
//! file are tallied in [`crate::types::LoadReport`] instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, SurveyError>;
