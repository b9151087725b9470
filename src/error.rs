use std::path::PathBuf;

use thiserror::Error;

/// Why a cost spreadsheet could not be turned into a dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File '{}' was not found", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Could not load or process the spreadsheet: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum CustosError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, CustosError>;
