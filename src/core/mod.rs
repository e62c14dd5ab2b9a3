pub mod errors;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::StageCategory;
use errors::RecordError;

/// An opportunity row as it appears in a CRM snapshot, before validation.
///
/// Field aliases accept the snake_case keys this crate writes, the camelCase
/// keys common in API exports, and the raw Salesforce column names found in
/// report exports.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RawOpportunity {
    #[serde(default, alias = "Id")]
    pub id: String,
    #[serde(default, alias = "closeDate", alias = "CloseDate")]
    pub close_date: Option<String>,
    #[serde(default, alias = "stageName", alias = "StageName")]
    pub stage_name: Option<String>,
    #[serde(default, alias = "lossReason", alias = "Loss_Reason__c")]
    pub loss_reason: Option<String>,
    #[serde(default, alias = "recordType", alias = "New_Business_or_Renewal__c")]
    pub record_type: Option<String>,
}

impl RawOpportunity {
    /// Validate a raw row into an [`OpportunityRecord`].
    ///
    /// A missing or unparseable close date, or a missing stage name, rejects
    /// this record only; callers accumulate rejections and keep aggregating
    /// the rest (see [`partition_records`](crate::io::records::partition_records)).
    pub fn validate(self) -> Result<OpportunityRecord, RecordError> {
        let RawOpportunity {
            id,
            close_date,
            stage_name,
            loss_reason,
            record_type,
        } = self;

        let raw_date = close_date
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let raw_date = match raw_date {
            Some(s) => s,
            None => return Err(RecordError::MissingCloseDate { id }),
        };
        let close_date = match raw_date.parse::<NaiveDate>() {
            Ok(date) => date,
            Err(_) => {
                return Err(RecordError::InvalidCloseDate {
                    id,
                    value: raw_date,
                })
            }
        };

        let stage_name = match stage_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            Some(s) => s,
            None => return Err(RecordError::MissingStageName { id }),
        };

        Ok(OpportunityRecord {
            id,
            close_date,
            stage_name,
            loss_reason,
            record_type,
        })
    }
}

/// A validated opportunity record, the aggregation input.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpportunityRecord {
    /// Opaque identifier; not used by aggregation beyond counting.
    pub id: String,
    pub close_date: NaiveDate,
    /// Looked up against the stage catalog; unknown names resolve to the
    /// fallback definition rather than being dropped.
    pub stage_name: String,
    /// Meaningful only when the stage category is ClosedLost; absent or
    /// blank values are normalized to "Not Specified" during aggregation.
    pub loss_reason: Option<String>,
    /// Business-line/renewal classification consumed by the record filter,
    /// never by aggregation.
    pub record_type: Option<String>,
}

/// Result of validating a batch of raw rows: the accepted records plus the
/// per-record rejections.
#[derive(Clone, Debug, Default)]
pub struct RecordIntake {
    pub records: Vec<OpportunityRecord>,
    pub rejected: Vec<RecordError>,
}

impl RecordIntake {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Per-stage record count enriched with the stage's catalog metadata.
///
/// Aggregation always emits one row per catalog stage (zero-filled), plus a
/// row for every unrecognized stage name observed in the data.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageCount {
    pub stage_name: String,
    pub count: usize,
    pub probability: u8,
    pub order: u32,
    pub category: StageCategory,
}

/// Per-reason count of closed-lost records.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LossReasonCount {
    pub reason: String,
    pub count: usize,
}

/// Aggregates for one ISO-8601 calendar week ("YYYY-Www").
///
/// Buckets exist only for weeks with at least one observed record; there is
/// no zero-fill across calendar gaps.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyBucket {
    /// ISO week key, e.g. "2025-W01". Zero-padded and year-first so the
    /// lexicographic order is the chronological order.
    pub week: String,
    pub total: usize,
    /// Count per stage name observed that week (dynamically keyed, not
    /// limited to catalog stages).
    pub stage_counts: BTreeMap<String, usize>,
    pub closed_won: usize,
    pub closed_lost: usize,
    pub other_stages: usize,
    /// `closed_won / total * 100`, 0 when the week is empty.
    pub win_rate: f64,
}

/// Ratio between the record counts of two stages adjacent in catalog order.
///
/// This is a naive snapshot ratio, not a cohort-survival funnel metric; see
/// [`conversions`](crate::summary::conversions).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConversionPair {
    pub from_stage: String,
    pub to_stage: String,
    pub from_count: usize,
    pub to_count: usize,
    pub conversion_rate: f64,
}

/// Scalar KPIs over a full stage-count table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct PipelineSummary {
    pub total: usize,
    pub closed_won: usize,
    pub closed_lost: usize,
    pub other_stages: usize,
    pub win_rate: f64,
}

/// The record filter that was applied upstream of aggregation, echoed into
/// the report for context.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportWindow {
    /// Records closed within this many days of `as_of`; `None` means no
    /// date constraint.
    pub days: Option<u32>,
    pub as_of: NaiveDate,
    pub record_types: Vec<String>,
}

/// Everything one aggregation pass produces, ready for rendering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineReport {
    pub generated_at: DateTime<Utc>,
    pub window: Option<ReportWindow>,
    pub summary: PipelineSummary,
    pub stages: Vec<StageCount>,
    pub loss_reasons: Vec<LossReasonCount>,
    pub weekly: Vec<WeeklyBucket>,
    pub conversions: Vec<ConversionPair>,
    pub rejected_records: usize,
}

/// Percentage of `part` over `whole`; defined as 0.0 when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
