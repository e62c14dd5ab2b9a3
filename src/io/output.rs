use anyhow::Context;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::catalog::StageCatalog;
use crate::core::PipelineReport;
use crate::io::writers::{JsonWriter, MarkdownWriter, TerminalWriter};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &PipelineReport) -> anyhow::Result<()>;
    fn write_catalog(&mut self, catalog: &StageCatalog) -> anyhow::Result<()>;
}

/// Build a writer for the requested format and destination.
///
/// The terminal format always renders to stdout; `output` redirects the
/// machine-readable formats into a file.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn ReportWriter>> {
    let writer: Box<dyn ReportWriter> = match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new()),
        OutputFormat::Json => match output {
            Some(path) => Box::new(JsonWriter::new(create_output_file(path)?)),
            None => Box::new(JsonWriter::new(io::stdout())),
        },
        OutputFormat::Markdown => match output {
            Some(path) => Box::new(MarkdownWriter::new(create_output_file(path)?)),
            None => Box::new(MarkdownWriter::new(io::stdout())),
        },
    };
    Ok(writer)
}

fn create_output_file(path: &Path) -> anyhow::Result<File> {
    File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))
}
