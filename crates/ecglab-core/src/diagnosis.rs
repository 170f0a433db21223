//! Diagnosis-time matching.
//!
//! For each ECG record, finds the earliest qualifying admission strictly
//! after the recording. An admission qualifies when one of its diagnoses
//! matches the ICD-10 prefix with `seq_num` at or below the threshold.
//! Matching is record-local and forward-looking: an ECG taken after every
//! qualifying admission gets no event, whatever happened before it.

use polars::prelude::{
    DataFrame, Expr, IntoLazy, JoinArgs, JoinType, SortMultipleOptions, col, lit,
};
use tracing::info;

use ecglab_model::DiseaseSpec;
use ecglab_model::columns::{
    ADMITTIME, ECG_TIME, HADM_ID, ICD_10_CODE, SEQ_NUM, STUDY_ID, SUBJECT_ID,
};

use crate::datetime::day_diff;
use crate::error::LabelError;
use crate::frame_utils::require_columns;

/// Label every ECG record with `<label>_time` / `<label>_event`.
///
/// Output: one row per input ECG record (`subject_id`, `study_id`, time,
/// event), sorted by subject and study. The time is the floored whole-day
/// difference to the earliest future qualifying `admittime`; null when no
/// event (never zero-filled).
pub fn match_disease_events(
    ecg: &DataFrame,
    admissions: &DataFrame,
    diagnoses: &DataFrame,
    spec: &DiseaseSpec,
) -> Result<DataFrame, LabelError> {
    require_columns("ecg", ecg, &[SUBJECT_ID, STUDY_ID, ECG_TIME])?;
    require_columns("admissions", admissions, &[SUBJECT_ID, HADM_ID, ADMITTIME])?;
    require_columns(
        "diagnoses",
        diagnoses,
        &[SUBJECT_ID, HADM_ID, ICD_10_CODE, SEQ_NUM],
    )?;

    let time_column = spec.time_column();
    let event_column = spec.event_column();

    // Admissions carrying a primary-enough matching diagnosis.
    let qualifying = diagnoses
        .clone()
        .lazy()
        .filter(
            col(ICD_10_CODE)
                .str()
                .starts_with(lit(spec.icd_prefix.as_str()))
                .and(col(SEQ_NUM).lt_eq(lit(spec.seq_threshold))),
        )
        .group_by([col(SUBJECT_ID), col(HADM_ID)])
        .agg(Vec::<Expr>::new())
        .join(
            admissions
                .clone()
                .lazy()
                .select([col(SUBJECT_ID), col(HADM_ID), col(ADMITTIME)]),
            [col(SUBJECT_ID), col(HADM_ID)],
            [col(SUBJECT_ID), col(HADM_ID)],
            JoinArgs::new(JoinType::Inner),
        );

    // Earliest qualifying admission strictly after each recording.
    let first_events = ecg
        .clone()
        .lazy()
        .select([col(SUBJECT_ID), col(STUDY_ID), col(ECG_TIME)])
        .join(
            qualifying,
            [col(SUBJECT_ID)],
            [col(SUBJECT_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .filter(col(ADMITTIME).gt(col(ECG_TIME)))
        .group_by([col(STUDY_ID)])
        .agg([col(ADMITTIME).min(), col(ECG_TIME).first()])
        .select([
            col(STUDY_ID),
            day_diff(col(ADMITTIME), col(ECG_TIME)).alias(time_column.as_str()),
        ]);

    let labeled = ecg
        .clone()
        .lazy()
        .select([col(SUBJECT_ID), col(STUDY_ID)])
        .join(
            first_events,
            [col(STUDY_ID)],
            [col(STUDY_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .select([
            col(SUBJECT_ID),
            col(STUDY_ID),
            col(time_column.as_str()),
            col(time_column.as_str()).is_not_null().alias(event_column.as_str()),
        ])
        .sort([SUBJECT_ID, STUDY_ID], SortMultipleOptions::default())
        .collect()?;

    info!(
        label = %spec.label,
        icd_prefix = %spec.icd_prefix,
        records = labeled.height(),
        events = labeled
            .column(&event_column)?
            .bool()?
            .sum()
            .unwrap_or_default(),
        "matched disease events"
    );
    Ok(labeled)
}
