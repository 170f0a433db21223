//! Tests for table reading and latest-event projections.

use std::path::Path;

use chrono::NaiveDateTime;
use polars::prelude::{AnyValue, DataFrame};
use tempfile::TempDir;

use ecglab_ingest::{IngestError, latest_event_times, read_table, write_csv};

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Timestamp cell as epoch microseconds; None for null.
fn micros_at(df: &DataFrame, column: &str, idx: usize) -> Option<i64> {
    match df.column(column).unwrap().get(idx).unwrap() {
        AnyValue::Null => None,
        AnyValue::Datetime(value, _, _) => Some(value),
        other => panic!("expected datetime cell, got {other:?}"),
    }
}

fn micros(timestamp: &str) -> i64 {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S")
        .unwrap()
        .and_utc()
        .timestamp_micros()
}

#[test]
fn missing_file_is_an_error() {
    let err = read_table(Path::new("/nonexistent/patients.csv"), &["dod"]).unwrap_err();
    assert!(matches!(err, IngestError::MissingFile(_)));
}

#[test]
fn timestamps_parse_and_blanks_become_null() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "patients.csv",
        "subject_id,dod\n1,2020-05-01\n2,\n3,2021-01-15\n",
    );
    let df = read_table(&path, &["dod"]).unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(df.column("dod").unwrap().null_count(), 1);
    assert_eq!(micros_at(&df, "dod", 0), Some(micros("2020-05-01 00:00:00")));
    assert_eq!(micros_at(&df, "dod", 1), None);
}

#[test]
fn unparsable_timestamp_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "ed.csv",
        "subject_id,outtime\n1,2020-01-01 10:00:00\n2,soon\n",
    );
    let err = read_table(&path, &["outtime"]).unwrap_err();
    match err {
        IngestError::Parse { column, message, .. } => {
            assert_eq!(column, "outtime");
            assert!(message.contains("soon"), "unexpected message: {message}");
        }
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn absent_timestamp_column_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "ed.csv", "subject_id,intime\n1,2020-01-01 10:00:00\n");
    let err = read_table(&path, &["outtime"]).unwrap_err();
    assert!(matches!(err, IngestError::Parse { .. }));
}

#[test]
fn latest_event_times_keeps_the_maximum_per_subject() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "ed.csv",
        "subject_id,outtime\n\
         1,2019-03-01 08:00:00\n\
         1,2019-06-15 12:00:00\n\
         2,2018-01-01 00:00:00\n\
         1,2019-01-10 09:30:00\n",
    );
    let df = read_table(&path, &["outtime"]).unwrap();
    let latest = latest_event_times(&df, "outtime").unwrap();

    assert_eq!(latest.height(), 2);
    assert_eq!(
        micros_at(&latest, "outtime", 0),
        Some(micros("2019-06-15 12:00:00"))
    );
    assert_eq!(
        micros_at(&latest, "outtime", 1),
        Some(micros("2018-01-01 00:00:00"))
    );
}

#[test]
fn written_tables_can_be_read_back() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "ecg.csv",
        "subject_id,study_id,ecg_time\n1,100,2021-01-01 09:00:00\n",
    );
    let mut df = read_table(&path, &["ecg_time"]).unwrap();

    let out = dir.path().join("derived").join("out.csv");
    write_csv(&mut df, &out).unwrap();
    let reread = read_table(&out, &["ecg_time"]).unwrap();
    assert_eq!(reread.height(), 1);
    assert_eq!(
        micros_at(&reread, "ecg_time", 0),
        Some(micros("2021-01-01 09:00:00"))
    );
}
