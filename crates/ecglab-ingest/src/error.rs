use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while loading source tables. All are fatal to the run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source table not found: {0}")]
    MissingFile(PathBuf),
    #[error("{path}: column '{column}': {message}")]
    Parse {
        column: String,
        path: PathBuf,
        message: String,
    },
    #[error(transparent)]
    Polars(#[from] PolarsError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
