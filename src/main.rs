use anyhow::Result;
use clap::Parser;
use funnelmap::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            path,
            format,
            output,
            window_days,
            as_of,
            record_types,
            config,
            verbosity,
        } => {
            init_logging(verbosity);
            let report_config = funnelmap::commands::report::ReportConfig {
                path,
                format,
                output,
                window_days,
                as_of,
                record_types,
                config,
            };
            funnelmap::commands::report::handle_report(report_config)
        }
        Commands::Catalog {
            format,
            config,
            verbosity,
        } => {
            init_logging(verbosity);
            funnelmap::commands::catalog::show_catalog(config, format)
        }
        Commands::Init { force } => {
            init_logging(0);
            funnelmap::commands::init::init_config(force)
        }
    }
}

/// Map -v counts onto log levels; RUST_LOG still wins when set.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
