//! Death-time annotation and censor-time backfill.
//!
//! Both passes reuse the censor table: death annotation attaches the
//! censor/death date to every ECG record, and the backfill gives non-event
//! disease rows a time-to-censoring so right-censored records still carry a
//! usable observation horizon.

use polars::prelude::{
    DataFrame, DataType, IntoLazy, JoinArgs, JoinType, SortMultipleOptions, col, when,
};
use tracing::info;

use ecglab_model::columns::{
    CENSOR_DEATH_DATE, DEATH_EVENT, DEATH_TIME, ECG_TIME, STUDY_ID, SUBJECT_ID,
};

use crate::datetime::{clamp_non_negative, day_diff};
use crate::error::LabelError;
use crate::frame_utils::require_columns;

/// Label every ECG record of a censored subject with `death_event` and
/// `death_time`.
///
/// Records of subjects absent from the censor table are dropped.
/// `death_time` is the floored day count from the recording to the
/// censor/death date, clamped at zero; null when the subject has no censor
/// date at all.
pub fn annotate_death(ecg: &DataFrame, censor: &DataFrame) -> Result<DataFrame, LabelError> {
    require_columns("ecg", ecg, &[SUBJECT_ID, STUDY_ID, ECG_TIME])?;
    require_columns(
        "censor",
        censor,
        &[SUBJECT_ID, CENSOR_DEATH_DATE, DEATH_EVENT],
    )?;

    let labeled = ecg
        .clone()
        .lazy()
        .select([col(SUBJECT_ID), col(STUDY_ID), col(ECG_TIME)])
        .join(
            censor
                .clone()
                .lazy()
                .select([col(SUBJECT_ID), col(CENSOR_DEATH_DATE), col(DEATH_EVENT)]),
            [col(SUBJECT_ID)],
            [col(SUBJECT_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .select([
            col(SUBJECT_ID),
            col(STUDY_ID),
            col(DEATH_EVENT),
            clamp_non_negative(day_diff(col(CENSOR_DEATH_DATE), col(ECG_TIME)))
                .alias(DEATH_TIME),
        ])
        .sort([SUBJECT_ID, STUDY_ID], SortMultipleOptions::default())
        .collect()?;

    info!(records = labeled.height(), "annotated death times");
    Ok(labeled)
}

/// Give non-event disease label rows a time-to-censoring.
///
/// Rows with `<label>_event = true` keep their diagnosis-based time; only
/// `event = false` rows are rewritten, to the unclamped day count from the
/// recording to the subject's censor date. Rows of subjects absent from the
/// censor table are dropped. A label row whose `study_id` has no ECG-time
/// row fails with [`LabelError::Lookup`].
pub fn backfill_censor_times(
    labels: &DataFrame,
    ecg: &DataFrame,
    censor: &DataFrame,
    label: &str,
) -> Result<DataFrame, LabelError> {
    let time_column = format!("{label}_time");
    let event_column = format!("{label}_event");
    require_columns(
        "labels",
        labels,
        &[SUBJECT_ID, STUDY_ID, &time_column, &event_column],
    )?;
    require_columns("ecg", ecg, &[STUDY_ID, ECG_TIME])?;
    require_columns("censor", censor, &[SUBJECT_ID, CENSOR_DEATH_DATE])?;

    let joined = labels
        .clone()
        .lazy()
        .select([
            col(SUBJECT_ID),
            col(STUDY_ID),
            col(time_column.as_str()),
            col(event_column.as_str()),
        ])
        .join(
            censor
                .clone()
                .lazy()
                .select([col(SUBJECT_ID), col(CENSOR_DEATH_DATE)]),
            [col(SUBJECT_ID)],
            [col(SUBJECT_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .join(
            ecg.clone().lazy().select([col(STUDY_ID), col(ECG_TIME)]),
            [col(STUDY_ID)],
            [col(STUDY_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    // Every surviving label row must resolve to a recording time.
    if joined.column(ECG_TIME)?.null_count() > 0 {
        let missing = joined
            .clone()
            .lazy()
            .filter(col(ECG_TIME).is_null())
            .select([col(STUDY_ID)])
            .collect()?;
        let key = missing.column(STUDY_ID)?.get(0)?.to_string();
        return Err(LabelError::Lookup {
            table: "ecg",
            key: format!("study_id {key}"),
        });
    }

    let backfilled = joined
        .lazy()
        .select([
            col(SUBJECT_ID),
            col(STUDY_ID),
            when(col(event_column.as_str()))
                .then(col(time_column.as_str()).cast(DataType::Int64))
                .otherwise(day_diff(col(CENSOR_DEATH_DATE), col(ECG_TIME)))
                .alias(time_column.as_str()),
            col(event_column.as_str()),
        ])
        .sort([SUBJECT_ID, STUDY_ID], SortMultipleOptions::default())
        .collect()?;

    info!(
        label,
        records = backfilled.height(),
        "backfilled censor times"
    );
    Ok(backfilled)
}
