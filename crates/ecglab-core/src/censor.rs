//! Censor-date computation.
//!
//! For every patient: the date of death when one is recorded, otherwise the
//! last moment the patient is known to have been alive (the maximum over the
//! latest ECG recording, ED departure, and admission discharge), otherwise
//! null.

use polars::prelude::{
    DataFrame, IntoLazy, JoinArgs, JoinType, SortMultipleOptions, UnionArgs, col, concat,
};
use tracing::info;

use ecglab_model::columns::{
    CENSOR_DEATH_DATE, DEATH_EVENT, DISCHTIME, DOD, ECG_TIME, OUTTIME, SUBJECT_ID,
};

use crate::error::LabelError;
use crate::frame_utils::require_columns;

/// Working column for the stacked latest-contact relation.
const LAST_SEEN: &str = "last_seen";

/// Compute one censor record per patient row.
///
/// Output columns: `subject_id`, `censor_death_date`, `death_event`, sorted
/// by subject. Patients with a death date take it verbatim; the alive-contact
/// sources are never consulted for them. Patients with no death and no
/// contact history get a null censor date.
pub fn compute_censor_dates(
    patients: &DataFrame,
    latest_ecg: &DataFrame,
    latest_ed: &DataFrame,
    latest_admission: &DataFrame,
) -> Result<DataFrame, LabelError> {
    require_columns("patients", patients, &[SUBJECT_ID, DOD])?;
    require_columns("latest ECG", latest_ecg, &[SUBJECT_ID, ECG_TIME])?;
    require_columns("latest ED", latest_ed, &[SUBJECT_ID, OUTTIME])?;
    require_columns("latest admission", latest_admission, &[SUBJECT_ID, DISCHTIME])?;

    // Stack the three projections into one (subject, last_seen) relation and
    // keep the maximum; the max is order-independent so the source of the
    // winning timestamp does not matter.
    let stacked = concat(
        [
            latest_ecg
                .clone()
                .lazy()
                .select([col(SUBJECT_ID), col(ECG_TIME).alias(LAST_SEEN)]),
            latest_ed
                .clone()
                .lazy()
                .select([col(SUBJECT_ID), col(OUTTIME).alias(LAST_SEEN)]),
            latest_admission
                .clone()
                .lazy()
                .select([col(SUBJECT_ID), col(DISCHTIME).alias(LAST_SEEN)]),
        ],
        UnionArgs::default(),
    )?;
    let last_contact = stacked
        .group_by([col(SUBJECT_ID)])
        .agg([col(LAST_SEEN).max()]);

    let censor = patients
        .clone()
        .lazy()
        .select([col(SUBJECT_ID), col(DOD)])
        .join(
            last_contact,
            [col(SUBJECT_ID)],
            [col(SUBJECT_ID)],
            JoinArgs::new(JoinType::Left),
        )
        .select([
            col(SUBJECT_ID),
            col(DOD).fill_null(col(LAST_SEEN)).alias(CENSOR_DEATH_DATE),
            col(DOD).is_not_null().alias(DEATH_EVENT),
        ])
        .sort([SUBJECT_ID], SortMultipleOptions::default())
        .collect()?;

    info!(
        patients = censor.height(),
        deaths = censor
            .column(DEATH_EVENT)?
            .bool()?
            .sum()
            .unwrap_or_default(),
        "computed censor dates"
    );
    Ok(censor)
}
