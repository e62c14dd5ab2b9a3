use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

use crate::aggregation::Aggregator;
use crate::cli;
use crate::config::FunnelmapConfig;
use crate::io::{self, RecordFilter};

pub struct ReportConfig {
    pub path: PathBuf,
    pub format: cli::OutputFormat,
    pub output: Option<PathBuf>,
    pub window_days: Option<u32>,
    pub as_of: Option<NaiveDate>,
    pub record_types: Option<Vec<String>>,
    pub config: Option<PathBuf>,
}

pub fn handle_report(config: ReportConfig) -> Result<()> {
    let settings = FunnelmapConfig::load(config.config.as_deref())?;
    let catalog = settings.catalog()?;

    let raw = io::load_snapshot(&config.path)?;
    log::info!(
        "Loaded {} raw record(s) from {}",
        raw.len(),
        config.path.display()
    );

    let intake = io::partition_records(raw);
    for rejection in &intake.rejected {
        log::warn!("Skipping {rejection}");
    }
    let rejected = intake.rejected_count();

    let filter = build_filter(&config, &settings);
    let window = filter.describe();
    let records = filter.apply(intake.records);

    let report = Aggregator::new(&catalog).report(&records, rejected, window);

    let mut writer = io::create_writer(config.format.into(), config.output.as_deref())?;
    writer.write_report(&report)?;

    Ok(())
}

/// Merge CLI flags over config-file defaults; flags win.
fn build_filter(config: &ReportConfig, settings: &FunnelmapConfig) -> RecordFilter {
    let window_days = config.window_days.or(settings.report.window_days);
    let as_of = config.as_of.unwrap_or_else(|| Local::now().date_naive());
    let record_types = config
        .record_types
        .clone()
        .unwrap_or_else(|| settings.report.record_types.clone());
    RecordFilter::new(window_days, as_of, record_types)
}
