//! Column names of the source and derived tables.
//!
//! Source names follow the MIMIC-IV hosp/ed/ecg table layouts; derived names
//! match the censor and event-label outputs consumed downstream.

/// Patient identifier, present in every source table.
pub const SUBJECT_ID: &str = "subject_id";
/// ECG recording identifier, unique per measurement row.
pub const STUDY_ID: &str = "study_id";
/// Hospital admission identifier.
pub const HADM_ID: &str = "hadm_id";

/// Date of death on the patients table; null for living patients.
pub const DOD: &str = "dod";
/// ED stay departure timestamp.
pub const OUTTIME: &str = "outtime";
/// Admission start timestamp.
pub const ADMITTIME: &str = "admittime";
/// Admission discharge timestamp.
pub const DISCHTIME: &str = "dischtime";
/// ECG recording timestamp.
pub const ECG_TIME: &str = "ecg_time";

/// ICD-10 diagnosis code.
pub const ICD_10_CODE: &str = "icd_10_code";
/// Importance rank of a diagnosis within its admission; lower is more primary.
pub const SEQ_NUM: &str = "seq_num";

/// Derived: last known date of contact, or date of death.
pub const CENSOR_DEATH_DATE: &str = "censor_death_date";
/// Derived: whether the censor date is an actual death date.
pub const DEATH_EVENT: &str = "death_event";
/// Derived: days from ECG recording to the censor/death date.
pub const DEATH_TIME: &str = "death_time";
