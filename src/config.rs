//! Configuration for report defaults and catalog overrides.
//!
//! Settings load from `funnelmap.toml` in the working directory, or from
//! an explicit `--config` path. The implicit file is best-effort: missing
//! or unparseable content falls back to defaults with a warning, while an
//! explicit path that fails is a hard error. The loaded value is threaded
//! through the command layer by reference; there is no process-global
//! configuration state.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::{default_loss_reasons, StageCatalog, StageDefinition};
use crate::core::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "funnelmap.toml";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FunnelmapConfig {
    /// Defaults applied when the report command omits the matching flags.
    #[serde(default)]
    pub report: ReportDefaults,

    /// Replacement stage catalog; absent means the built-in one.
    #[serde(default)]
    pub catalog: Option<CatalogOverride>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReportDefaults {
    /// Lookback window in days.
    #[serde(default)]
    pub window_days: Option<u32>,

    /// Record-type filter values, matched exactly.
    #[serde(default)]
    pub record_types: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogOverride {
    pub stages: Vec<StageDefinition>,

    /// Recognized loss reasons; absent keeps the built-in list.
    #[serde(default)]
    pub loss_reasons: Option<Vec<String>>,
}

impl FunnelmapConfig {
    /// Load configuration from an explicit path or the implicit
    /// `funnelmap.toml`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => {
                Ok(try_load_from_path(Path::new(CONFIG_FILE_NAME)).unwrap_or_default())
            }
        }
    }

    fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = toml::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Build the stage catalog this run aggregates against.
    ///
    /// An override replaces the built-in stages wholesale and is validated
    /// strictly; bad reference data should stop the run rather than skew
    /// every count.
    pub fn catalog(&self) -> Result<StageCatalog> {
        match &self.catalog {
            Some(over) => {
                let loss_reasons = over
                    .loss_reasons
                    .clone()
                    .unwrap_or_else(default_loss_reasons);
                StageCatalog::new(over.stages.clone(), loss_reasons)
            }
            None => Ok(StageCatalog::default()),
        }
    }
}

/// Read a config file, returning `None` both when it does not exist and
/// when it cannot be used. Only real problems are logged; a missing
/// implicit file is the normal case.
fn try_load_from_path(path: &Path) -> Option<FunnelmapConfig> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read config file {}: {e}", path.display());
            }
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => {
            log::debug!("Loaded config from {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Failed to parse {}: {e}. Using default configuration.",
                path.display()
            );
            None
        }
    }
}
