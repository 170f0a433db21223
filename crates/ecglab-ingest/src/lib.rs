//! Source-table ingestion for the ECG survival-label pipeline.
//!
//! Reads the five MIMIC-style source tables (patients, ED stays, admissions,
//! ICD-10 diagnoses, ECG measurements) into polars frames, parses their
//! timestamp columns strictly, and derives the per-subject latest-event
//! projections the censor-date engine consumes.

pub mod error;
pub mod projections;
pub mod reader;
pub mod sources;

pub use error::IngestError;
pub use projections::latest_event_times;
pub use reader::{read_table, write_csv};
pub use sources::{SourceTables, load_sources};
