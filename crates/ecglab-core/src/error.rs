use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised during label computation. All are fatal to the run.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("required column '{column}' missing from {table} table")]
    MissingColumn { table: &'static str, column: String },
    #[error("no {table} row for {key}")]
    Lookup { table: &'static str, key: String },
    #[error(transparent)]
    Polars(#[from] PolarsError),
}
