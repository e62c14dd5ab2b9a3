pub mod output;
pub mod records;
pub mod writers;

// Re-export the output surface for convenient access
pub use output::{create_writer, OutputFormat, ReportWriter};
pub use records::{load_snapshot, partition_records, RecordFilter};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}
