use crate::aggregate::run_aggregation;
use crate::config::{AggregateConfig, FileFilter};
use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Concatenate every file in a directory tree into a single text file",
    after_help = "Example:\n  code-aggregator ./my_project/src ./output combined_code.txt"
)]
pub struct Cli {
    /// Directory whose files are collected (walked recursively)
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Directory the result is written to (created if it does not exist)
    #[arg(value_name = "DESTINATION_DIR")]
    pub destination_dir: PathBuf,

    /// Name of the aggregated output file
    #[arg(value_name = "OUTPUT_NAME")]
    pub output_name: PathBuf,

    /// Only include files with these extensions
    #[arg(short = 'e', long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Skip files and directories whose name or relative path matches these glob patterns
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Log level; overrides the global level from RUST_LOG [default: info]
    #[arg(
        long,
        value_name = "LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: Option<String>,
}

pub fn run(args: Cli) -> Result<()> {
    init_logging(args.log_level.as_deref())?;

    let filter = FileFilter::new(&args.extensions, &args.ignore)?;
    let config = AggregateConfig::new(args.source_dir, args.destination_dir, args.output_name)?
        .with_filter(filter);

    let report = run_aggregation(&config)?;
    if report.files_failed > 0 {
        warn!(
            "{} of {} files could not be read; see placeholders in the output",
            report.files_failed,
            report.total_processed()
        );
    }

    Ok(())
}

/// Logs go to stderr. `RUST_LOG` is read first, falling back to info; an
/// explicit `--log-level` replaces its global level.
fn init_logging(log_level: Option<&str>) -> Result<()> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    if let Some(log_level) = log_level {
        let level = match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        filter = filter.add_directive(level.into());
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logging: {}", err))
}
