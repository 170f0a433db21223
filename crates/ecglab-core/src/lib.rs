//! Label computation for the ECG survival-label pipeline.
//!
//! Three engines over already-loaded polars frames:
//!
//! 1. [`censor::compute_censor_dates`] — one censor/death date per patient.
//! 2. [`diagnosis::match_disease_events`] — per-ECG time to the first
//!    qualifying ICD-10 admission after the recording.
//! 3. [`annotate`] — death labels per ECG, and censor-time backfill for
//!    non-event disease rows.
//!
//! All engines are pure functions of their input frames, built as
//! group-by/join pipelines rather than per-patient loops.

pub mod annotate;
pub mod censor;
pub mod datetime;
pub mod diagnosis;
pub mod error;
mod frame_utils;

pub use annotate::{annotate_death, backfill_censor_times};
pub use censor::compute_censor_dates;
pub use diagnosis::match_disease_events;
pub use error::LabelError;
