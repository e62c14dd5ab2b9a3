// Export modules for library usage
pub mod aggregation;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod summary;

// Re-export commonly used types
pub use crate::aggregation::{iso_week_key, Aggregator};
pub use crate::catalog::{StageCatalog, StageCategory, StageDefinition};
pub use crate::core::{
    ConversionPair, LossReasonCount, OpportunityRecord, PipelineReport, PipelineSummary,
    RawOpportunity, RecordIntake, ReportWindow, StageCount, WeeklyBucket,
};

pub use crate::io::output::{create_writer, OutputFormat, ReportWriter};
pub use crate::io::records::{load_snapshot, partition_records, RecordFilter};

pub use crate::summary::{conversions, summarize};
