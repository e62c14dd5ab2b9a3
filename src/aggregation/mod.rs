//! Stage, loss-reason, and weekly aggregation over validated records.
//!
//! The [`Aggregator`] borrows a [`StageCatalog`] and turns a slice of
//! [`OpportunityRecord`]s into the count tables a report is built from.
//! Every pass is a single scan into a hash map followed by a
//! deterministic sort, so output order never depends on input order.

pub mod weekly;

pub use weekly::iso_week_key;

use chrono::Utc;
use std::collections::HashMap;

use crate::catalog::{StageCatalog, StageCategory, StageDefinition, NOT_SPECIFIED};
use crate::core::{
    LossReasonCount, OpportunityRecord, PipelineReport, ReportWindow, StageCount, WeeklyBucket,
};
use crate::summary;

pub struct Aggregator<'a> {
    catalog: &'a StageCatalog,
}

impl<'a> Aggregator<'a> {
    pub fn new(catalog: &'a StageCatalog) -> Self {
        Self { catalog }
    }

    /// Count records per stage, zero-filling every catalog stage.
    ///
    /// Stage names absent from the catalog still get a row, carrying the
    /// fallback metadata (probability 0, order 99, Unknown). Rows are
    /// sorted by catalog order, then name for equal orders.
    pub fn aggregate_stages(&self, records: &[OpportunityRecord]) -> Vec<StageCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *counts.entry(record.stage_name.as_str()).or_insert(0) += 1;
        }

        let mut rows: Vec<StageCount> = Vec::with_capacity(self.catalog.stages().len());
        for def in self.catalog.stages() {
            rows.push(StageCount {
                stage_name: def.name.clone(),
                count: counts.remove(def.name.as_str()).unwrap_or(0),
                probability: def.probability,
                order: def.order,
                category: def.category,
            });
        }

        // Whatever is left was observed in the data but never defined.
        for (name, count) in counts {
            let def = StageDefinition::fallback(name);
            rows.push(StageCount {
                stage_name: def.name,
                count,
                probability: def.probability,
                order: def.order,
                category: def.category,
            });
        }

        rows.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| a.stage_name.cmp(&b.stage_name))
        });
        rows
    }

    /// Count closed-lost records per loss reason.
    ///
    /// Only records whose stage category is ClosedLost participate; blank
    /// or missing reasons count under "Not Specified". Every catalog
    /// reason gets a row even at zero. Rows are sorted by count
    /// descending, then reason ascending.
    pub fn aggregate_loss_reasons(&self, records: &[OpportunityRecord]) -> Vec<LossReasonCount> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for record in records {
            if self.catalog.category_of(&record.stage_name) != StageCategory::ClosedLost {
                continue;
            }
            *counts
                .entry(normalize_reason(record.loss_reason.as_deref()))
                .or_insert(0) += 1;
        }

        let mut rows: Vec<LossReasonCount> =
            Vec::with_capacity(self.catalog.loss_reasons().len());
        for reason in self.catalog.loss_reasons() {
            rows.push(LossReasonCount {
                reason: reason.clone(),
                count: counts.remove(reason).unwrap_or(0),
            });
        }
        for (reason, count) in counts {
            rows.push(LossReasonCount { reason, count });
        }

        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.reason.cmp(&b.reason)));
        rows
    }

    /// Bucket records by the ISO week of their close date.
    pub fn aggregate_weekly(&self, records: &[OpportunityRecord]) -> Vec<WeeklyBucket> {
        weekly::aggregate_weekly(self.catalog, records)
    }

    /// Run every aggregation pass and assemble the full report.
    pub fn report(
        &self,
        records: &[OpportunityRecord],
        rejected_records: usize,
        window: Option<ReportWindow>,
    ) -> PipelineReport {
        let stages = self.aggregate_stages(records);
        let summary = summary::summarize(&stages);
        let conversions = summary::conversions(&stages);

        PipelineReport {
            generated_at: Utc::now(),
            window,
            summary,
            loss_reasons: self.aggregate_loss_reasons(records),
            weekly: self.aggregate_weekly(records),
            conversions,
            stages,
            rejected_records,
        }
    }
}

/// Collapse absent and blank loss reasons into the "Not Specified" bucket.
fn normalize_reason(reason: Option<&str>) -> String {
    match reason.map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}
