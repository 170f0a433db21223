//! Per-subject latest-event projections.

use polars::prelude::{DataFrame, IntoLazy, SortMultipleOptions, col};

use ecglab_model::columns;

use crate::error::IngestError;

/// Reduce a table to one row per subject holding the maximum of
/// `timestamp_column`.
///
/// Only the timestamp survives the aggregation, so ties between rows sharing
/// the maximum are immaterial. The result is sorted by subject for
/// deterministic output.
pub fn latest_event_times(
    df: &DataFrame,
    timestamp_column: &str,
) -> Result<DataFrame, IngestError> {
    let latest = df
        .clone()
        .lazy()
        .group_by([col(columns::SUBJECT_ID)])
        .agg([col(timestamp_column).max()])
        .sort([columns::SUBJECT_ID], SortMultipleOptions::default())
        .collect()?;
    Ok(latest)
}
