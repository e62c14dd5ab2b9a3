//! Snapshot loading, validation intake, and upstream record filtering.
//!
//! Aggregation itself never reads files or applies filters; everything a
//! pass consumes arrives through this boundary as an already-filtered
//! record collection.

use chrono::{Days, NaiveDate};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::errors::{Error, Result};
use crate::core::{OpportunityRecord, RawOpportunity, RecordIntake, ReportWindow};

/// A snapshot file is either a bare JSON array of rows or the query
/// envelope CRM export tools wrap around one.
#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Records(Vec<RawOpportunity>),
    Envelope { records: Vec<RawOpportunity> },
}

impl Snapshot {
    fn into_records(self) -> Vec<RawOpportunity> {
        match self {
            Snapshot::Records(records) | Snapshot::Envelope { records } => records,
        }
    }
}

/// Read a snapshot file into raw rows, without validating them.
pub fn load_snapshot(path: &Path) -> Result<Vec<RawOpportunity>> {
    let content = fs::read_to_string(path).map_err(|e| Error::RecordSource {
        message: format!("failed to read snapshot: {e}"),
        path: Some(path.to_path_buf()),
        source: Some(e),
    })?;
    let snapshot: Snapshot = serde_json::from_str(&content).map_err(|e| {
        Error::record_source(format!("failed to parse snapshot: {e}"), path)
    })?;
    Ok(snapshot.into_records())
}

/// Validate raw rows, splitting them into accepted records and rejections.
///
/// Rejections never abort the batch; they ride alongside the accepted
/// records so reports can surface the count.
pub fn partition_records(raw: Vec<RawOpportunity>) -> RecordIntake {
    let mut intake = RecordIntake::default();
    for row in raw {
        match row.validate() {
            Ok(record) => intake.records.push(record),
            Err(err) => {
                log::debug!("rejecting record: {err}");
                intake.rejected.push(err);
            }
        }
    }
    intake
}

/// Upstream record filter applied between intake and aggregation.
///
/// The window keeps records with `as_of - days < close_date <= as_of`.
/// Record types match exactly; an empty list passes everything, and a
/// record without a type never matches a non-empty list.
#[derive(Clone, Debug)]
pub struct RecordFilter {
    pub window_days: Option<u32>,
    pub as_of: NaiveDate,
    pub record_types: Vec<String>,
}

impl RecordFilter {
    pub fn new(window_days: Option<u32>, as_of: NaiveDate, record_types: Vec<String>) -> Self {
        Self {
            window_days,
            as_of,
            record_types,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.window_days.is_none() && self.record_types.is_empty()
    }

    pub fn matches(&self, record: &OpportunityRecord) -> bool {
        if let Some(days) = self.window_days {
            if record.close_date > self.as_of {
                return false;
            }
            // A window larger than the calendar has no lower bound.
            if let Some(start) = self.as_of.checked_sub_days(Days::new(u64::from(days))) {
                if record.close_date <= start {
                    return false;
                }
            }
        }
        if !self.record_types.is_empty() {
            match &record.record_type {
                Some(t) => {
                    if !self.record_types.iter().any(|allowed| allowed == t) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }

    pub fn apply(&self, records: Vec<OpportunityRecord>) -> Vec<OpportunityRecord> {
        let before = records.len();
        let kept: Vec<OpportunityRecord> =
            records.into_iter().filter(|r| self.matches(r)).collect();
        log::debug!("filter kept {} of {} records", kept.len(), before);
        kept
    }

    /// Window descriptor echoed into reports; `None` when the filter
    /// passes everything unchanged.
    pub fn describe(&self) -> Option<ReportWindow> {
        if self.is_noop() {
            return None;
        }
        Some(ReportWindow {
            days: self.window_days,
            as_of: self.as_of,
            record_types: self.record_types.clone(),
        })
    }
}
