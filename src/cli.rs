use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "funnelmap")]
#[command(about = "Sales pipeline funnel and weekly trend reporter", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate an opportunity snapshot into stage, loss-reason, and
    /// weekly tables
    Report {
        /// Path to the snapshot file (JSON)
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep only records closing within this many days of --as-of
        #[arg(long)]
        window_days: Option<u32>,

        /// Reference date for the window, ISO format (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Record types to keep, exact match
        #[arg(long = "record-type", value_delimiter = ',')]
        record_types: Option<Vec<String>>,

        /// Configuration file path
        #[arg(short, long, env = "FUNNELMAP_CONFIG")]
        config: Option<PathBuf>,

        /// Increase logging detail
        /// -v: Show informational messages
        /// -vv: Show per-record debug output
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Show the stage catalog a report would aggregate against
    Catalog {
        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Configuration file path
        #[arg(short, long, env = "FUNNELMAP_CONFIG")]
        config: Option<PathBuf>,

        /// Increase logging detail
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Create a starter funnelmap.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
