//! Pipeline configuration model.
//!
//! Deserialized from a JSON file by the CLI. Paths to the individual source
//! tables are derived from the dataset root using the standard MIMIC-IV
//! layout; only the ECG measurements table lives outside that tree.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Base locations for a pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Root of the MIMIC-IV extract (contains `hosp/` and `ed/`).
    pub mimic_root: PathBuf,
    /// ECG machine-measurements table (plain CSV).
    pub ecg_record_path: PathBuf,
    /// Directory for all derived outputs.
    pub output_dir: PathBuf,
}

impl DataPaths {
    pub fn patients(&self) -> PathBuf {
        self.table_path("hosp", "patients")
    }

    pub fn ed_stays(&self) -> PathBuf {
        self.table_path("ed", "edstays")
    }

    pub fn admissions(&self) -> PathBuf {
        self.table_path("hosp", "admissions")
    }

    pub fn diagnoses(&self) -> PathBuf {
        self.table_path("hosp", "diagnoses_icd10")
    }

    pub fn ecg_records(&self) -> &Path {
        &self.ecg_record_path
    }

    /// Prefer the gzip-compressed distribution form, fall back to plain CSV
    /// for unpacked extracts.
    fn table_path(&self, subdir: &str, stem: &str) -> PathBuf {
        let dir = self.mimic_root.join(subdir);
        let compressed = dir.join(format!("{stem}.csv.gz"));
        if compressed.exists() {
            compressed
        } else {
            dir.join(format!("{stem}.csv"))
        }
    }
}

/// One disease to label, identified by an ICD-10 code prefix.
#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseSpec {
    /// Prefix match against `icd_10_code` (e.g. `I48`).
    pub icd_prefix: String,
    /// Name used for the output columns and file.
    pub label: String,
    /// Inclusive upper bound on `seq_num` for a diagnosis to count.
    #[serde(default = "default_seq_threshold")]
    pub seq_threshold: i64,
}

fn default_seq_threshold() -> i64 {
    3
}

impl DiseaseSpec {
    pub fn new(icd_prefix: impl Into<String>, label: impl Into<String>, seq_threshold: i64) -> Self {
        Self {
            icd_prefix: icd_prefix.into(),
            label: label.into(),
            seq_threshold,
        }
    }

    /// Output column holding days from ECG to the event.
    pub fn time_column(&self) -> String {
        format!("{}_time", self.label)
    }

    /// Output column holding the event flag.
    pub fn event_column(&self) -> String {
        format!("{}_event", self.label)
    }
}

/// Full configuration for a composed `run`.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub paths: DataPaths,
    /// Diseases to label; may be empty for a censor-only run.
    #[serde(default)]
    pub diseases: Vec<DiseaseSpec>,
}
