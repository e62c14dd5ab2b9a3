//! Stage reference data for the sales pipeline.
//!
//! The catalog is the authoritative mapping from a stage name to its win
//! probability, display order, and category, plus the recognized set of
//! loss-reason strings. It is constructed once (built-in defaults or from
//! configuration) and passed by reference into the aggregation layer; there
//! is no process-global catalog.
//!
//! Lookups never fail: a stage name absent from the catalog resolves to a
//! synthetic fallback definition (`probability = 0`, `order = 99`,
//! `category = Unknown`) so that records with unrecognized stages are
//! counted rather than dropped.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::core::errors::Error;

/// Bucket that absent or blank loss reasons are normalized into.
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Display order assigned to stages missing from the catalog.
pub const FALLBACK_ORDER: u32 = 99;

/// Coarse classification of a pipeline stage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StageCategory {
    Open,
    ClosedWon,
    ClosedLost,
    /// Fallback for stage names the catalog does not recognize.
    Unknown,
}

impl std::fmt::Display for StageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(StageCategory, &str)] = &[
            (StageCategory::Open, "Open"),
            (StageCategory::ClosedWon, "Closed Won"),
            (StageCategory::ClosedLost, "Closed Lost"),
            (StageCategory::Unknown, "Unknown"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// A single stage definition: name, CRM win probability, total order, category.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageDefinition {
    pub name: String,
    /// CRM-assigned win probability, 0-100.
    pub probability: u8,
    /// Position in the funnel; unique per stage, ascending toward close.
    pub order: u32,
    pub category: StageCategory,
}

impl StageDefinition {
    pub fn new(
        name: impl Into<String>,
        probability: u8,
        order: u32,
        category: StageCategory,
    ) -> Self {
        Self {
            name: name.into(),
            probability,
            order,
            category,
        }
    }

    /// Synthetic definition for a stage name the catalog does not know.
    pub fn fallback(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            probability: 0,
            order: FALLBACK_ORDER,
            category: StageCategory::Unknown,
        }
    }
}

/// The authoritative set of pipeline stages and loss reasons.
#[derive(Clone, Debug, Serialize)]
pub struct StageCatalog {
    /// Kept sorted ascending by `order`.
    stages: Vec<StageDefinition>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
    loss_reasons: Vec<String>,
}

impl StageCatalog {
    /// Build a catalog from explicit definitions, validating that stage
    /// names and orders are unique and probabilities are in range.
    pub fn new(stages: Vec<StageDefinition>, loss_reasons: Vec<String>) -> Result<Self, Error> {
        if stages.is_empty() {
            return Err(Error::Catalog("catalog must define at least one stage".into()));
        }

        let mut seen_names: HashSet<&str> = HashSet::new();
        let mut seen_orders: HashMap<u32, &str> = HashMap::new();
        for stage in &stages {
            if stage.name.trim().is_empty() {
                return Err(Error::Catalog("stage name must not be empty".into()));
            }
            if stage.probability > 100 {
                return Err(Error::Catalog(format!(
                    "stage {:?} has probability {} outside 0-100",
                    stage.name, stage.probability
                )));
            }
            if !seen_names.insert(stage.name.as_str()) {
                return Err(Error::Catalog(format!(
                    "duplicate stage name {:?}",
                    stage.name
                )));
            }
            if let Some(other) = seen_orders.insert(stage.order, stage.name.as_str()) {
                return Err(Error::Catalog(format!(
                    "stages {:?} and {:?} share order {}",
                    other, stage.name, stage.order
                )));
            }
        }

        let mut stages = stages;
        stages.sort_by(|a, b| a.order.cmp(&b.order));
        Ok(Self::from_sorted(stages, loss_reasons))
    }

    fn from_sorted(stages: Vec<StageDefinition>, loss_reasons: Vec<String>) -> Self {
        let by_name = stages
            .iter()
            .enumerate()
            .map(|(idx, stage)| (stage.name.clone(), idx))
            .collect();
        Self {
            stages,
            by_name,
            loss_reasons,
        }
    }

    /// Resolve a stage name to its definition. Names absent from the
    /// catalog resolve to [`StageDefinition::fallback`]; this never fails.
    pub fn lookup(&self, stage_name: &str) -> StageDefinition {
        match self.by_name.get(stage_name) {
            Some(&idx) => self.stages[idx].clone(),
            None => StageDefinition::fallback(stage_name),
        }
    }

    /// Category of a stage name, `Unknown` when absent from the catalog.
    pub fn category_of(&self, stage_name: &str) -> StageCategory {
        self.by_name
            .get(stage_name)
            .map(|&idx| self.stages[idx].category)
            .unwrap_or(StageCategory::Unknown)
    }

    /// All stage definitions, ascending by `order`.
    pub fn stages(&self) -> &[StageDefinition] {
        &self.stages
    }

    /// The fixed loss-reason enumeration used for zero-fill.
    pub fn loss_reasons(&self) -> &[String] {
        &self.loss_reasons
    }
}

impl Default for StageCatalog {
    /// The built-in renewal pipeline: the insurance stages the aggregates
    /// were originally reported over.
    fn default() -> Self {
        Self::from_sorted(default_stages(), default_loss_reasons())
    }
}

fn default_stages() -> Vec<StageDefinition> {
    vec![
        StageDefinition::new("Gathering Information", 10, 1, StageCategory::Open),
        StageDefinition::new("Rating", 30, 2, StageCategory::Open),
        StageDefinition::new("Quoting", 50, 3, StageCategory::Open),
        StageDefinition::new("Proposal", 70, 4, StageCategory::Open),
        StageDefinition::new("Binding", 90, 5, StageCategory::Open),
        StageDefinition::new("Closed Won", 100, 6, StageCategory::ClosedWon),
        StageDefinition::new("Closed Lost", 0, 7, StageCategory::ClosedLost),
    ]
}

pub(crate) fn default_loss_reasons() -> Vec<String> {
    [
        "Rate",
        "Coverage",
        "Carrier Declined",
        "Service",
        "Went with Competitor",
        "No Response",
        NOT_SPECIFIED,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
