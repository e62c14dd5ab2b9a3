//! CLI command implementations.
//!
//! Each submodule handles one subcommand, from flag/config merging through
//! rendering:
//! - **report**: aggregate a snapshot into the full pipeline report
//! - **catalog**: show the stage catalog a report would run against
//! - **init**: write a starter configuration file

pub mod catalog;
pub mod init;
pub mod report;

pub use catalog::show_catalog;
pub use init::init_config;
pub use report::{handle_report, ReportConfig};
