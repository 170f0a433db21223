//! Loading of the five source tables.

use polars::prelude::DataFrame;
use tracing::info;

use ecglab_model::{DataPaths, columns};

use crate::error::IngestError;
use crate::projections::latest_event_times;
use crate::reader::read_table;

/// The raw source tables of one pipeline run, timestamps already parsed.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub patients: DataFrame,
    pub ed_stays: DataFrame,
    pub admissions: DataFrame,
    pub diagnoses: DataFrame,
    pub ecg_records: DataFrame,
}

impl SourceTables {
    /// Latest ED departure per subject.
    pub fn latest_ed_times(&self) -> Result<DataFrame, IngestError> {
        latest_event_times(&self.ed_stays, columns::OUTTIME)
    }

    /// Latest admission discharge per subject.
    pub fn latest_admission_times(&self) -> Result<DataFrame, IngestError> {
        latest_event_times(&self.admissions, columns::DISCHTIME)
    }

    /// Latest ECG recording per subject.
    pub fn latest_ecg_times(&self) -> Result<DataFrame, IngestError> {
        latest_event_times(&self.ecg_records, columns::ECG_TIME)
    }
}

/// Load every source table and log row and subject counts per source.
pub fn load_sources(paths: &DataPaths) -> Result<SourceTables, IngestError> {
    let patients = read_table(&paths.patients(), &[columns::DOD])?;
    let ed_stays = read_table(&paths.ed_stays(), &[columns::OUTTIME])?;
    let admissions = read_table(
        &paths.admissions(),
        &[columns::ADMITTIME, columns::DISCHTIME],
    )?;
    let diagnoses = read_table(&paths.diagnoses(), &[])?;
    let ecg_records = read_table(paths.ecg_records(), &[columns::ECG_TIME])?;

    let tables = SourceTables {
        patients,
        ed_stays,
        admissions,
        diagnoses,
        ecg_records,
    };
    tables.log_counts()?;
    Ok(tables)
}

impl SourceTables {
    fn log_counts(&self) -> Result<(), IngestError> {
        for (name, df) in [
            ("patients", &self.patients),
            ("ed_stays", &self.ed_stays),
            ("admissions", &self.admissions),
            ("diagnoses", &self.diagnoses),
            ("ecg_records", &self.ecg_records),
        ] {
            let subjects = df.column(columns::SUBJECT_ID)?.n_unique()?;
            info!(source = name, rows = df.height(), subjects, "loaded source table");
        }
        Ok(())
    }
}
