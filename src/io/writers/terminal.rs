use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use crate::catalog::StageCatalog;
use crate::core::{ConversionPair, LossReasonCount, PipelineReport, StageCount, WeeklyBucket};
use crate::io::output::ReportWriter;

pub struct TerminalWriter;

impl Default for TerminalWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportWriter for TerminalWriter {
    fn write_report(&mut self, report: &PipelineReport) -> anyhow::Result<()> {
        print_header(report);
        print_summary(report);
        print_stages(&report.stages);
        print_loss_reasons(&report.loss_reasons);
        print_weekly(&report.weekly);
        print_conversions(&report.conversions);
        Ok(())
    }

    fn write_catalog(&mut self, catalog: &StageCatalog) -> anyhow::Result<()> {
        println!("{}", "Stage Catalog".bold().blue());
        println!("{}", "=============".blue());
        println!();
        println!("{}", catalog_table(catalog));
        println!();
        println!("{}", "Loss reasons:".bold());
        for reason in catalog.loss_reasons() {
            println!("  - {reason}");
        }
        Ok(())
    }
}

fn print_header(report: &PipelineReport) {
    println!("{}", "Pipeline Funnel Report".bold().blue());
    println!("{}", "======================".blue());
    if let Some(window) = &report.window {
        match window.days {
            Some(days) => println!("Window: last {} days as of {}", days, window.as_of),
            None => println!("Window: all records as of {}", window.as_of),
        }
        if !window.record_types.is_empty() {
            println!("Record types: {}", window.record_types.join(", "));
        }
    }
    println!();
}

fn print_summary(report: &PipelineReport) {
    let summary = &report.summary;
    println!("{} Summary:", "📊".bold());
    println!("  Total records: {}", summary.total);
    println!("  Closed won: {}", summary.closed_won.to_string().green());
    println!("  Closed lost: {}", summary.closed_lost.to_string().red());
    println!("  Open pipeline: {}", summary.other_stages);
    println!("  Win rate: {:.1}%", summary.win_rate);
    if report.rejected_records > 0 {
        println!(
            "  {} {} record(s) rejected during validation",
            "⚠".yellow(),
            report.rejected_records
        );
    }
    println!();
}

fn print_stages(stages: &[StageCount]) {
    if stages.is_empty() {
        return;
    }
    println!("{}", "Stage Breakdown".bold());
    println!("{}", stage_table(stages));
    println!();
}

fn print_loss_reasons(reasons: &[LossReasonCount]) {
    if reasons.is_empty() {
        return;
    }
    println!("{}", "Loss Reasons".bold());
    println!("{}", loss_reason_table(reasons));
    println!();
}

fn print_weekly(weekly: &[WeeklyBucket]) {
    if weekly.is_empty() {
        return;
    }
    println!("{} {}", "📈".bold(), "Weekly Trend".bold());
    println!("{}", weekly_table(weekly));
    println!();
}

fn print_conversions(conversions: &[ConversionPair]) {
    if conversions.is_empty() {
        return;
    }
    println!("{}", "Stage Conversions".bold());
    println!(
        "{}",
        "Snapshot count ratios, not cohort survival rates.".dimmed()
    );
    println!("{}", conversion_table(conversions));
}

fn stage_table(stages: &[StageCount]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Stage", "Count", "Probability", "Category"]);
    for stage in stages {
        table.add_row(vec![
            stage.stage_name.clone(),
            stage.count.to_string(),
            format!("{}%", stage.probability),
            stage.category.to_string(),
        ]);
    }
    table
}

fn loss_reason_table(reasons: &[LossReasonCount]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Reason", "Count"]);
    for reason in reasons {
        table.add_row(vec![reason.reason.clone(), reason.count.to_string()]);
    }
    table
}

fn weekly_table(weekly: &[WeeklyBucket]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Week", "Total", "Won", "Lost", "Other", "Win Rate"]);
    for bucket in weekly {
        table.add_row(vec![
            bucket.week.clone(),
            bucket.total.to_string(),
            bucket.closed_won.to_string(),
            bucket.closed_lost.to_string(),
            bucket.other_stages.to_string(),
            format!("{:.1}%", bucket.win_rate),
        ]);
    }
    table
}

fn conversion_table(conversions: &[ConversionPair]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["From", "To", "From Count", "To Count", "Rate"]);
    for pair in conversions {
        table.add_row(vec![
            pair.from_stage.clone(),
            pair.to_stage.clone(),
            pair.from_count.to_string(),
            pair.to_count.to_string(),
            format!("{:.1}%", pair.conversion_rate),
        ]);
    }
    table
}

fn catalog_table(catalog: &StageCatalog) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Stage", "Probability", "Order", "Category"]);
    for stage in catalog.stages() {
        table.add_row(vec![
            stage.name.clone(),
            format!("{}%", stage.probability),
            stage.order.to_string(),
            stage.category.to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StageCategory;

    #[test]
    fn test_stage_table_renders_rows() {
        let stages = vec![StageCount {
            stage_name: "Rating".to_string(),
            count: 4,
            probability: 30,
            order: 2,
            category: StageCategory::Open,
        }];

        let rendered = stage_table(&stages).to_string();

        assert!(rendered.contains("Rating"));
        assert!(rendered.contains("30%"));
        assert!(rendered.contains("Open"));
    }

    #[test]
    fn test_weekly_table_formats_win_rate() {
        let weekly = vec![WeeklyBucket {
            week: "2025-W01".to_string(),
            total: 4,
            stage_counts: Default::default(),
            closed_won: 1,
            closed_lost: 1,
            other_stages: 2,
            win_rate: 25.0,
        }];

        let rendered = weekly_table(&weekly).to_string();

        assert!(rendered.contains("2025-W01"));
        assert!(rendered.contains("25.0%"));
    }

    #[test]
    fn test_catalog_table_lists_every_stage() {
        let catalog = StageCatalog::default();
        let rendered = catalog_table(&catalog).to_string();

        for stage in catalog.stages() {
            assert!(rendered.contains(stage.name.as_str()));
        }
    }
}
