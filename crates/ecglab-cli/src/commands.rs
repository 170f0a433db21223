//! Command implementations: each subcommand mirrors one stage of the label
//! pipeline, and `run` composes them over a single in-memory load.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info_span;

use ecglab_core::{
    annotate_death, backfill_censor_times, compute_censor_dates, match_disease_events,
};
use ecglab_ingest::{latest_event_times, load_sources, read_table, write_csv};
use ecglab_model::{DiseaseSpec, PipelineConfig, columns};

use crate::cli::{BackfillArgs, CensorArgs, DeathArgs, DiseaseArgs, RunArgs};
use crate::summary::RunSummary;

/// Load the JSON pipeline configuration.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(config)
}

pub fn run_censor(args: &CensorArgs) -> Result<RunSummary> {
    let config = load_config(&args.config)?;
    let span = info_span!("censor");
    let _guard = span.enter();

    let paths = &config.paths;
    let patients = read_table(&paths.patients(), &[columns::DOD]).context("load patients")?;
    let ed_stays = read_table(&paths.ed_stays(), &[columns::OUTTIME]).context("load ED stays")?;
    let admissions = read_table(
        &paths.admissions(),
        &[columns::ADMITTIME, columns::DISCHTIME],
    )
    .context("load admissions")?;
    let ecg_records =
        read_table(paths.ecg_records(), &[columns::ECG_TIME]).context("load ECG records")?;

    let mut censor = compute_censor_dates(
        &patients,
        &latest_event_times(&ecg_records, columns::ECG_TIME)?,
        &latest_event_times(&ed_stays, columns::OUTTIME)?,
        &latest_event_times(&admissions, columns::DISCHTIME)?,
    )
    .context("compute censor dates")?;

    let output = output_path(args.output.clone(), &config, "censor_death_date.csv");
    write_csv(&mut censor, &output).context("write censor table")?;
    Ok(RunSummary::single("censor", censor.height(), output))
}

pub fn run_disease(args: &DiseaseArgs) -> Result<RunSummary> {
    let config = load_config(&args.config)?;
    let spec = DiseaseSpec::new(&args.icd_prefix, &args.label, args.seq_threshold);
    let span = info_span!("disease", label = %spec.label);
    let _guard = span.enter();

    let paths = &config.paths;
    let ecg_records =
        read_table(paths.ecg_records(), &[columns::ECG_TIME]).context("load ECG records")?;
    let admissions = read_table(
        &paths.admissions(),
        &[columns::ADMITTIME, columns::DISCHTIME],
    )
    .context("load admissions")?;
    let diagnoses = read_table(&paths.diagnoses(), &[]).context("load diagnoses")?;

    let mut labels = match_disease_events(&ecg_records, &admissions, &diagnoses, &spec)
        .context("match disease events")?;

    let default_name = format!("ecg_{}_events.csv", spec.label);
    let output = output_path(args.output.clone(), &config, &default_name);
    write_csv(&mut labels, &output).context("write disease labels")?;
    Ok(RunSummary::single(spec.label, labels.height(), output))
}

pub fn run_death(args: &DeathArgs) -> Result<RunSummary> {
    let config = load_config(&args.config)?;
    let span = info_span!("death");
    let _guard = span.enter();

    let censor = read_table(&args.censor, &[columns::CENSOR_DEATH_DATE])
        .context("load censor table")?;
    let ecg_records = read_table(config.paths.ecg_records(), &[columns::ECG_TIME])
        .context("load ECG records")?;

    let mut labels = annotate_death(&ecg_records, &censor).context("annotate death times")?;

    let output = output_path(args.output.clone(), &config, "ecg_death_events.csv");
    write_csv(&mut labels, &output).context("write death labels")?;
    Ok(RunSummary::single("death", labels.height(), output))
}

pub fn run_backfill(args: &BackfillArgs) -> Result<RunSummary> {
    let config = load_config(&args.config)?;
    let span = info_span!("backfill", label = %args.label);
    let _guard = span.enter();

    let censor = read_table(&args.censor, &[columns::CENSOR_DEATH_DATE])
        .context("load censor table")?;
    let labels = read_table(&args.labels, &[]).context("load disease labels")?;
    let ecg_records = read_table(config.paths.ecg_records(), &[columns::ECG_TIME])
        .context("load ECG records")?;

    let mut updated = backfill_censor_times(&labels, &ecg_records, &censor, &args.label)
        .context("backfill censor times")?;

    let default_name = format!("ecg_{}_events_updated.csv", args.label);
    let output = output_path(args.output.clone(), &config, &default_name);
    write_csv(&mut updated, &output).context("write backfilled labels")?;
    Ok(RunSummary::single(
        format!("{} (updated)", args.label),
        updated.height(),
        output,
    ))
}

pub fn run_pipeline(args: &RunArgs) -> Result<RunSummary> {
    let config = load_config(&args.config)?;
    run_with_config(&config)
}

/// Full pipeline over one in-memory load: censor dates, then per-disease
/// labels with censor-time backfill, then death labels.
pub fn run_with_config(config: &PipelineConfig) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    let sources = {
        let span = info_span!("ingest");
        let _guard = span.enter();
        load_sources(&config.paths).context("load source tables")?
    };

    let censor = {
        let span = info_span!("censor");
        let _guard = span.enter();
        compute_censor_dates(
            &sources.patients,
            &sources.latest_ecg_times()?,
            &sources.latest_ed_times()?,
            &sources.latest_admission_times()?,
        )
        .context("compute censor dates")?
    };
    let censor_path = config.paths.output_dir.join("censor_death_date.csv");
    write_csv(&mut censor.clone(), &censor_path).context("write censor table")?;
    summary.push("censor", censor.height(), censor_path);

    for spec in &config.diseases {
        let span = info_span!("disease", label = %spec.label);
        let _guard = span.enter();

        let mut labels =
            match_disease_events(&sources.ecg_records, &sources.admissions, &sources.diagnoses, spec)
                .context("match disease events")?;
        let labels_path = config
            .paths
            .output_dir
            .join(format!("ecg_{}_events.csv", spec.label));
        write_csv(&mut labels, &labels_path).context("write disease labels")?;
        summary.push(spec.label.clone(), labels.height(), labels_path);

        let mut updated =
            backfill_censor_times(&labels, &sources.ecg_records, &censor, &spec.label)
                .context("backfill censor times")?;
        let updated_path = config
            .paths
            .output_dir
            .join(format!("ecg_{}_events_updated.csv", spec.label));
        write_csv(&mut updated, &updated_path).context("write backfilled labels")?;
        summary.push(format!("{} (updated)", spec.label), updated.height(), updated_path);
    }

    let mut death = {
        let span = info_span!("death");
        let _guard = span.enter();
        annotate_death(&sources.ecg_records, &censor).context("annotate death times")?
    };
    let death_path = config.paths.output_dir.join("ecg_death_events.csv");
    write_csv(&mut death, &death_path).context("write death labels")?;
    summary.push("death", death.height(), death_path);

    Ok(summary)
}

fn output_path(explicit: Option<PathBuf>, config: &PipelineConfig, default_name: &str) -> PathBuf {
    explicit.unwrap_or_else(|| config.paths.output_dir.join(default_name))
}
