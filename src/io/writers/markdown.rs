use std::io::Write;

use crate::catalog::StageCatalog;
use crate::core::{ConversionPair, LossReasonCount, PipelineReport, StageCount, WeeklyBucket};
use crate::io::output::ReportWriter;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        self.write_stages(&report.stages)?;
        self.write_loss_reasons(&report.loss_reasons)?;
        self.write_weekly(&report.weekly)?;
        self.write_conversions(&report.conversions)?;
        Ok(())
    }

    fn write_catalog(&mut self, catalog: &StageCatalog) -> anyhow::Result<()> {
        writeln!(self.writer, "# Stage Catalog")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Stage | Probability | Order | Category |")?;
        writeln!(self.writer, "|-------|-------------|-------|----------|")?;
        for stage in catalog.stages() {
            writeln!(
                self.writer,
                "| {} | {}% | {} | {} |",
                stage.name, stage.probability, stage.order, stage.category
            )?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "## Loss Reasons")?;
        writeln!(self.writer)?;
        for reason in catalog.loss_reasons() {
            writeln!(self.writer, "- {reason}")?;
        }
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Pipeline Funnel Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        if let Some(window) = &report.window {
            match window.days {
                Some(days) => writeln!(
                    self.writer,
                    "Window: last {} days as of {}",
                    days, window.as_of
                )?,
                None => writeln!(self.writer, "Window: all records as of {}", window.as_of)?,
            }
            if !window.record_types.is_empty() {
                writeln!(
                    self.writer,
                    "Record types: {}",
                    window.record_types.join(", ")
                )?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        let summary = &report.summary;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Total records | {} |", summary.total)?;
        writeln!(self.writer, "| Closed won | {} |", summary.closed_won)?;
        writeln!(self.writer, "| Closed lost | {} |", summary.closed_lost)?;
        writeln!(self.writer, "| Open pipeline | {} |", summary.other_stages)?;
        writeln!(self.writer, "| Win rate | {:.1}% |", summary.win_rate)?;
        if report.rejected_records > 0 {
            writeln!(
                self.writer,
                "| Rejected records | {} |",
                report.rejected_records
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_stages(&mut self, stages: &[StageCount]) -> anyhow::Result<()> {
        if stages.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Stage Breakdown")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Stage | Count | Probability | Category |")?;
        writeln!(self.writer, "|-------|-------|-------------|----------|")?;
        for stage in stages {
            writeln!(
                self.writer,
                "| {} | {} | {}% | {} |",
                stage.stage_name, stage.count, stage.probability, stage.category
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_loss_reasons(&mut self, reasons: &[LossReasonCount]) -> anyhow::Result<()> {
        if reasons.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Loss Reasons")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Reason | Count |")?;
        writeln!(self.writer, "|--------|-------|")?;
        for reason in reasons {
            writeln!(self.writer, "| {} | {} |", reason.reason, reason.count)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_weekly(&mut self, weekly: &[WeeklyBucket]) -> anyhow::Result<()> {
        if weekly.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Weekly Trend")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Week | Total | Won | Lost | Other | Win Rate |"
        )?;
        writeln!(
            self.writer,
            "|------|-------|-----|------|-------|----------|"
        )?;
        for bucket in weekly {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {:.1}% |",
                bucket.week,
                bucket.total,
                bucket.closed_won,
                bucket.closed_lost,
                bucket.other_stages,
                bucket.win_rate
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_conversions(&mut self, conversions: &[ConversionPair]) -> anyhow::Result<()> {
        if conversions.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Stage Conversions")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Adjacent-stage count ratios from a single snapshot; these are not \
             cohort survival rates and can exceed 100%."
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| From | To | From Count | To Count | Rate |")?;
        writeln!(self.writer, "|------|----|-----------:|---------:|------|")?;
        for pair in conversions {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {:.1}% |",
                pair.from_stage, pair.to_stage, pair.from_count, pair.to_count, pair.conversion_rate
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}
