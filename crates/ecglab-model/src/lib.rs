//! Shared types for the ECG survival-label pipeline.
//!
//! This crate holds the configuration model and the column vocabulary used
//! across ingestion and label computation. It deliberately has no polars
//! dependency so the column names stay usable from any layer.

pub mod columns;
pub mod config;

pub use config::{DataPaths, DiseaseSpec, PipelineConfig};
