//! Death-annotation and censor-backfill tests.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{AnyValue, Column, DataFrame, DatetimeChunked, IntoColumn, TimeUnit};

use ecglab_core::{LabelError, annotate_death, backfill_censor_times};

fn ts(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|date| date.and_time(NaiveTime::MIN))
        })
        .unwrap()
}

fn datetime_column(name: &str, values: &[Option<&str>]) -> Column {
    let parsed: Vec<Option<NaiveDateTime>> = values.iter().map(|value| value.map(ts)).collect();
    DatetimeChunked::from_naive_datetime_options(name.into(), parsed, TimeUnit::Microseconds)
        .into_column()
}

fn id_column(name: &str, values: &[i64]) -> Column {
    Column::new(name.into(), values)
}

fn time_at(df: &DataFrame, column: &str, idx: usize) -> Option<i64> {
    match df.column(column).unwrap().get(idx).unwrap() {
        AnyValue::Null => None,
        AnyValue::Int64(days) => Some(days),
        other => panic!("expected day count, got {other:?}"),
    }
}

fn bool_at(df: &DataFrame, column: &str, idx: usize) -> bool {
    match df.column(column).unwrap().get(idx).unwrap() {
        AnyValue::Boolean(value) => value,
        other => panic!("expected bool, got {other:?}"),
    }
}

/// Subjects 1 (died 2020-05-01), 2 (censored 2020-05-01, alive), 3 (no
/// censor date at all).
fn censor_fixture() -> DataFrame {
    DataFrame::new(vec![
        id_column("subject_id", &[1, 2, 3]),
        datetime_column(
            "censor_death_date",
            &[Some("2020-05-01"), Some("2020-05-01"), None],
        ),
        Column::new("death_event".into(), &[true, false, false][..]),
    ])
    .unwrap()
}

fn ecg_fixture() -> DataFrame {
    DataFrame::new(vec![
        id_column("subject_id", &[1, 2, 3, 9]),
        id_column("study_id", &[100, 200, 300, 900]),
        datetime_column(
            "ecg_time",
            &[
                Some("2020-01-01 00:00:00"),
                Some("2020-06-01 00:00:00"),
                Some("2020-01-01 00:00:00"),
                Some("2020-01-01 00:00:00"),
            ],
        ),
    ])
    .unwrap()
}

#[test]
fn death_time_is_days_from_recording_to_death() {
    let labels = annotate_death(&ecg_fixture(), &censor_fixture()).unwrap();

    assert!(bool_at(&labels, "death_event", 0));
    assert_eq!(time_at(&labels, "death_time", 0), Some(121));
}

#[test]
fn recordings_after_the_censor_date_clamp_to_zero() {
    let labels = annotate_death(&ecg_fixture(), &censor_fixture()).unwrap();

    assert!(!bool_at(&labels, "death_event", 1));
    assert_eq!(time_at(&labels, "death_time", 1), Some(0));
}

#[test]
fn unknown_censor_date_leaves_death_time_null() {
    let labels = annotate_death(&ecg_fixture(), &censor_fixture()).unwrap();
    assert_eq!(time_at(&labels, "death_time", 2), None);
}

#[test]
fn subjects_outside_the_censor_table_are_dropped() {
    let labels = annotate_death(&ecg_fixture(), &censor_fixture()).unwrap();
    // subject 9 has no censor record
    assert_eq!(labels.height(), 3);
}

fn label_fixture() -> DataFrame {
    DataFrame::new(vec![
        id_column("subject_id", &[1, 1]),
        id_column("study_id", &[100, 101]),
        Column::new("af_time".into(), &[None, Some(40i64)][..]),
        Column::new("af_event".into(), &[false, true][..]),
    ])
    .unwrap()
}

fn backfill_ecg_fixture() -> DataFrame {
    DataFrame::new(vec![
        id_column("subject_id", &[1, 1]),
        id_column("study_id", &[100, 101]),
        datetime_column(
            "ecg_time",
            &[Some("2022-01-01 00:00:00"), Some("2021-01-01 00:00:00")],
        ),
    ])
    .unwrap()
}

fn backfill_censor_fixture(censor_date: &str) -> DataFrame {
    DataFrame::new(vec![
        id_column("subject_id", &[1]),
        datetime_column("censor_death_date", &[Some(censor_date)]),
        Column::new("death_event".into(), &[false][..]),
    ])
    .unwrap()
}

#[test]
fn backfill_rewrites_only_non_event_rows() {
    let labels = backfill_censor_times(
        &label_fixture(),
        &backfill_ecg_fixture(),
        &backfill_censor_fixture("2022-04-01"),
        "af",
    )
    .unwrap();

    // non-event row: 2022-01-01 -> 2022-04-01 censor date
    assert_eq!(time_at(&labels, "af_time", 0), Some(90));
    // event row keeps its diagnosis-based time
    assert_eq!(time_at(&labels, "af_time", 1), Some(40));
    assert!(bool_at(&labels, "af_event", 1));
}

#[test]
fn backfill_times_may_be_negative() {
    let labels = backfill_censor_times(
        &label_fixture(),
        &backfill_ecg_fixture(),
        &backfill_censor_fixture("2021-10-03"),
        "af",
    )
    .unwrap();

    // censor date 90 days before the recording; no clamping here
    assert_eq!(time_at(&labels, "af_time", 0), Some(-90));
}

#[test]
fn backfill_without_an_ecg_row_is_a_lookup_error() {
    let labels = DataFrame::new(vec![
        id_column("subject_id", &[1]),
        id_column("study_id", &[999]),
        Column::new("af_time".into(), &[None::<i64>][..]),
        Column::new("af_event".into(), &[false][..]),
    ])
    .unwrap();

    let err = backfill_censor_times(
        &labels,
        &backfill_ecg_fixture(),
        &backfill_censor_fixture("2022-04-01"),
        "af",
    )
    .unwrap_err();
    match err {
        LabelError::Lookup { table, key } => {
            assert_eq!(table, "ecg");
            assert!(key.contains("999"), "unexpected key: {key}");
        }
        other => panic!("expected lookup error, got {other}"),
    }
}
