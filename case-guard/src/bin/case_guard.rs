//! case-guard command line
//!
//! Scans test-case CSV files and prints one report per file. With
//! `--final-check`, files that reported issues are loaded again and
//! re-scanned in strict mode, where warnings count as failures.
//!
//! Exit status: 0 when the last report of every file has no failures, 1
//! otherwise, 2 when a file or the configuration cannot be read.

use anyhow::{bail, Context, Result};
use case_guard::config::ConfigFile;
use case_guard::core::{ScanResult, Scanner};
use case_guard::formatters::{
    FormatterConfig, HumanFormatter, JsonFormatter, ReportFormatter, ScanReport,
};
use case_guard::logging::setup::{init_logging, LoggingConfig};
use case_guard::logging::LogConfig;
use case_guard::sources::CsvSource;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Test-case CSV files or glob patterns; defaults to `files` from --config
    paths: Vec<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Re-scan files with issues in strict mode (warnings become failures)
    #[arg(long)]
    final_check: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Disable ANSI colours in human reports
    #[arg(long)]
    no_color: bool,

    /// Show at most this many issues per report
    #[arg(long)]
    max_issues: Option<usize>,

    /// Log level for diagnostics on stderr
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every file passed.
fn run(args: &Args) -> Result<bool> {
    init_logging(
        LoggingConfig::default()
            .with_level(Level::WARN)
            .with_crate_level(args.log_level)
            .with_json_format(args.json_logs),
    )?;

    let config = match &args.config {
        Some(path) => ConfigFile::from_path(path)?,
        None => ConfigFile::default(),
    };

    let patterns = if args.paths.is_empty() {
        config.files.clone()
    } else {
        args.paths.clone()
    };
    if patterns.is_empty() {
        bail!("no test case files given; pass paths or list `files` in the config file");
    }
    let sources = CsvSource::from_globs(&patterns)?;

    let log_config = if args.log_level >= Level::DEBUG {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    let scanner = Scanner::new(config.scan).with_log_config(log_config);
    let formatter = formatter(args);

    let mut all_passed = true;
    for source in &sources {
        let result = scan(&scanner, source)?;
        print_report(formatter.as_ref(), ScanReport::new(source.name(), result.clone()))?;

        let last = if args.final_check && !result.issues.is_empty() {
            info!(file = %source.name(), "Running final check");
            let strict = scan(&scanner, source)?.strict();
            print_report(
                formatter.as_ref(),
                ScanReport::new(source.name(), strict.clone()).final_check(),
            )?;
            strict
        } else {
            result
        };

        all_passed &= !last.has_failures();
    }

    Ok(all_passed)
}

fn scan(scanner: &Scanner, source: &CsvSource) -> Result<ScanResult> {
    scanner
        .scan_source(source)
        .with_context(|| format!("Could not load test case file {}", source.path().display()))
}

fn formatter(args: &Args) -> Box<dyn ReportFormatter> {
    let mut config = FormatterConfig::default().with_colors(!args.no_color);
    if let Some(max) = args.max_issues {
        config = config.with_max_issues(max);
    }

    match args.format {
        OutputFormat::Human => Box::new(HumanFormatter::with_config(config)),
        OutputFormat::Json => Box::new(JsonFormatter::with_config(config).with_pretty(false)),
    }
}

fn print_report(formatter: &dyn ReportFormatter, report: ScanReport) -> Result<()> {
    let output = formatter.format(&report)?;
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
    Ok(())
}
