use polars::prelude::DataFrame;

use crate::error::LabelError;

/// Fail early with the table and column named instead of a join error later.
pub(crate) fn require_columns(
    table: &'static str,
    df: &DataFrame,
    columns: &[&str],
) -> Result<(), LabelError> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(LabelError::MissingColumn {
                table,
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}
