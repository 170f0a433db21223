//! CLI argument definitions for the label pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ecglab",
    version,
    about = "Derive survival labels (censor dates, disease and death time-to-event) from MIMIC-style ECG records",
    long_about = "Compute right-censoring dates per patient and time-to-event labels per ECG\n\
                  recording, joining ECG measurements with admissions, ICD-10 diagnoses,\n\
                  ED stays, and mortality data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline: censor dates, disease labels, death labels,
    /// censor-time backfill.
    Run(RunArgs),

    /// Compute the per-patient censor/death date table.
    Censor(CensorArgs),

    /// Label ECG records with time to the first qualifying diagnosis.
    Disease(DiseaseArgs),

    /// Label ECG records with death events from an existing censor table.
    Death(DeathArgs),

    /// Backfill censor-based times into non-event disease label rows.
    Backfill(BackfillArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// JSON configuration file (paths and disease list).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

#[derive(Parser)]
pub struct CensorArgs {
    /// JSON configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output CSV (default: <output_dir>/censor_death_date.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DiseaseArgs {
    /// JSON configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// ICD-10 code prefix that qualifies an admission.
    #[arg(long = "icd-prefix", default_value = "I48")]
    pub icd_prefix: String,

    /// Label used for the output columns and file name.
    #[arg(long = "label", default_value = "atrial_fibrillation")]
    pub label: String,

    /// Inclusive upper bound on seq_num for a diagnosis to count.
    #[arg(long = "seq-threshold", default_value_t = 3)]
    pub seq_threshold: i64,

    /// Output CSV (default: <output_dir>/ecg_<label>_events.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DeathArgs {
    /// JSON configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Censor table CSV produced by `ecglab censor`.
    #[arg(long = "censor", value_name = "PATH")]
    pub censor: PathBuf,

    /// Output CSV (default: <output_dir>/ecg_death_events.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct BackfillArgs {
    /// JSON configuration file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Censor table CSV produced by `ecglab censor`.
    #[arg(long = "censor", value_name = "PATH")]
    pub censor: PathBuf,

    /// Disease label CSV produced by `ecglab disease`.
    #[arg(long = "labels", value_name = "PATH")]
    pub labels: PathBuf,

    /// Label the input columns are named for.
    #[arg(long = "label")]
    pub label: String,

    /// Output CSV (default: <output_dir>/ecg_<label>_events_updated.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
