use std::io::Write;

use crate::catalog::StageCatalog;
use crate::core::PipelineReport;
use crate::io::output::ReportWriter;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_catalog(&mut self, catalog: &StageCatalog) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(catalog)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::Aggregator;

    #[test]
    fn test_json_report_round_trips() {
        let catalog = StageCatalog::default();
        let report = Aggregator::new(&catalog).report(&[], 0, None);
        let mut buffer = Vec::new();

        JsonWriter::new(&mut buffer).write_report(&report).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["summary"]["total"], 0);
        assert_eq!(
            parsed["stages"].as_array().unwrap().len(),
            catalog.stages().len()
        );
    }

    #[test]
    fn test_json_catalog_lists_stages_and_reasons() {
        let catalog = StageCatalog::default();
        let mut buffer = Vec::new();

        JsonWriter::new(&mut buffer)
            .write_catalog(&catalog)
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(
            parsed["stages"].as_array().unwrap().len(),
            catalog.stages().len()
        );
        assert!(parsed["loss_reasons"]
            .as_array()
            .unwrap()
            .iter()
            .any(|r| r == "Not Specified"));
    }
}
