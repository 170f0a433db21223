//! CSV reading and writing with strict timestamp handling.
//!
//! Timestamp columns are read as strings and converted with chrono so that an
//! unparsable value fails the run with the offending column and file named,
//! instead of silently becoming null. Gzip-compressed inputs (`.csv.gz`) are
//! decompressed transparently by the polars reader.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{
    CsvReadOptions, CsvWriter, DataFrame, DataType, DatetimeChunked, IntoSeries, Schema,
    SerReader, SerWriter, TimeUnit,
};
use tracing::debug;

use crate::error::IngestError;

/// MIMIC timestamps: `2021-02-10 08:30:00`, with an optional fraction.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
/// ISO variant produced by our own CSV writer round-trip.
const DATETIME_FORMAT_ISO: &str = "%Y-%m-%dT%H:%M:%S%.f";
/// Date-only values such as `dod`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read a delimited-text table, parsing the named columns as timestamps.
///
/// Returns [`IngestError::MissingFile`] when `path` does not exist and
/// [`IngestError::Parse`] when a timestamp column is absent or holds an
/// unparsable value. Empty cells parse to null.
pub fn read_table(path: &Path, timestamp_columns: &[&str]) -> Result<DataFrame, IngestError> {
    if !path.exists() {
        return Err(IngestError::MissingFile(path.to_path_buf()));
    }

    // Force timestamp columns to string so inference cannot pre-empt parsing.
    let mut overrides = Schema::with_capacity(timestamp_columns.len());
    for column in timestamp_columns {
        overrides.with_column((*column).into(), DataType::String);
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(overrides)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    for column in timestamp_columns {
        parse_timestamp_column(&mut df, path, column)?;
    }

    debug!(path = %path.display(), rows = df.height(), "read table");
    Ok(df)
}

/// Write a derived table as CSV, creating parent directories as needed.
///
/// Datetimes are written in the MIMIC `%Y-%m-%d %H:%M:%S` form so derived
/// tables can be re-read by [`read_table`].
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), IngestError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    CsvWriter::new(file)
        .include_header(true)
        .with_datetime_format(Some("%Y-%m-%d %H:%M:%S".to_string()))
        .finish(df)?;
    debug!(path = %path.display(), rows = df.height(), "wrote table");
    Ok(())
}

fn parse_timestamp_column(
    df: &mut DataFrame,
    path: &Path,
    column: &str,
) -> Result<(), IngestError> {
    let parse_error = |message: String| IngestError::Parse {
        column: column.to_string(),
        path: path.to_path_buf(),
        message,
    };

    let values = df
        .column(column)
        .map_err(|_| parse_error("column not present".to_string()))?
        .str()
        .map_err(|err| parse_error(err.to_string()))?;

    let mut parsed: Vec<Option<NaiveDateTime>> = Vec::with_capacity(values.len());
    for value in values {
        match value {
            None => parsed.push(None),
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    parsed.push(None);
                } else {
                    let timestamp = parse_timestamp(trimmed).ok_or_else(|| {
                        parse_error(format!("unparsable timestamp '{trimmed}'"))
                    })?;
                    parsed.push(Some(timestamp));
                }
            }
        }
    }

    let series =
        DatetimeChunked::from_naive_datetime_options(column.into(), parsed, TimeUnit::Microseconds)
            .into_series();
    df.with_column(series)?;
    Ok(())
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT) {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT_ISO) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::parse_timestamp;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn accepts_mimic_and_iso_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2021, 2, 10)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2021-02-10 08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-02-10T08:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-02-10T08:30:00.000000"), Some(expected));
    }

    #[test]
    fn date_only_parses_to_midnight() {
        let expected = NaiveDate::from_ymd_opt(2020, 5, 1)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(parse_timestamp("2020-05-01"), Some(expected));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2020-13-01"), None);
    }
}
