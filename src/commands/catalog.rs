use anyhow::Result;
use std::path::PathBuf;

use crate::cli;
use crate::config::FunnelmapConfig;
use crate::io;

pub fn show_catalog(config_path: Option<PathBuf>, format: cli::OutputFormat) -> Result<()> {
    let settings = FunnelmapConfig::load(config_path.as_deref())?;
    let catalog = settings.catalog()?;

    let mut writer = io::create_writer(format.into(), None)?;
    writer.write_catalog(&catalog)?;

    Ok(())
}
