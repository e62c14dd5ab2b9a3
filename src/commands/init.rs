use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::PathBuf;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let default_config = r#"# Funnelmap Configuration

[report]
# Lookback window applied when --window-days is not passed.
window_days = 56
# Record types to keep; an empty list keeps everything.
record_types = [
    "Personal Lines - Renewal",
    "Commercial Lines - Renewal",
]

# Replace the built-in reference data by defining every stage here.
# [catalog]
# loss_reasons = ["Rate", "Coverage", "Not Specified"]

# [[catalog.stages]]
# name = "Gathering Information"
# probability = 10
# order = 1
# category = "Open"
"#;

    io::write_file(&config_path, default_config)?;
    println!("Created funnelmap.toml configuration file");

    Ok(())
}
