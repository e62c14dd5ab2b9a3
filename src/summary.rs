//! Scalar KPIs and stage-to-stage conversion ratios.
//!
//! Pure functions over an already-aggregated stage-count table; nothing
//! here touches raw records.

use crate::catalog::StageCategory;
use crate::core::{percentage, ConversionPair, PipelineSummary, StageCount};

/// Roll a stage-count table up into scalar KPIs.
pub fn summarize(stages: &[StageCount]) -> PipelineSummary {
    let mut summary = PipelineSummary::default();
    for stage in stages {
        summary.total += stage.count;
        match stage.category {
            StageCategory::ClosedWon => summary.closed_won += stage.count,
            StageCategory::ClosedLost => summary.closed_lost += stage.count,
            StageCategory::Open | StageCategory::Unknown => summary.other_stages += stage.count,
        }
    }
    summary.win_rate = percentage(summary.closed_won, summary.total);
    summary
}

/// Ratio between the counts of each pair of stages adjacent in order.
///
/// This compares headcounts within one snapshot rather than following a
/// cohort through the funnel, so a pair can exceed 100% whenever a later
/// stage holds more records than the one before it. Callers must not read
/// these as survival rates.
pub fn conversions(stages: &[StageCount]) -> Vec<ConversionPair> {
    let mut ordered: Vec<&StageCount> = stages.iter().collect();
    ordered.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.stage_name.cmp(&b.stage_name))
    });

    ordered
        .windows(2)
        .map(|pair| ConversionPair {
            from_stage: pair[0].stage_name.clone(),
            to_stage: pair[1].stage_name.clone(),
            from_count: pair[0].count,
            to_count: pair[1].count,
            conversion_rate: percentage(pair[1].count, pair[0].count),
        })
        .collect()
}
