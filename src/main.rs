//! CLI entry point for the wine statistics tool.
//!
//! Provides subcommands for the standard Flavanoids and Gamma report, for
//! summarizing a single field, and for listing the known fields.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use wine_stats::analyzers::analyzer::{DEFAULT_FIELDS, analyze_file};
use wine_stats::analyzers::types::Report;
use wine_stats::dataset::Field;
use wine_stats::output::{append_record, print_pretty, render_report, to_csv, to_json};
use wine_stats::policy::Policy;

#[derive(Parser)]
#[command(name = "wine_stats")]
#[command(about = "Per-class mean, median and mode of wine measurements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flavanoids and Gamma statistics per Alcohol class
    Report {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Statistics of a single field per Alcohol class
    Stats {
        /// Field name or slug (e.g. "flavanoids", "color-intensity", "gamma")
        #[arg(short, long)]
        field: Field,

        #[command(flatten)]
        run: RunArgs,
    },
    /// List the fields statistics can be computed over
    Fields,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Dataset file (.json or .csv). Defaults to $WINE_STATS_DATA, then to the
    /// bundled data/wine.json, a 10-row sample of the wine table
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Write to this file instead of stdout (CSV output is appended)
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// How missing values, empty classes and zero Magnesium are handled:
    /// "strict" fails, "permissive" lets NaN/inf through
    #[arg(short, long, default_value_t = Policy::Strict)]
    policy: Policy,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/wine_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("wine_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report { run } => run_report(&DEFAULT_FIELDS, run)?,
        Commands::Stats { field, run } => run_report(&[field], run)?,
        Commands::Fields => {
            for field in Field::ALL {
                let kind = if field.is_derived() { "derived" } else { "measured" };
                println!("{:<22} {:<30} {}", field.slug(), field.name(), kind);
            }
        }
    }

    Ok(())
}

/// Runs the pipeline for `fields` and writes the result in the requested format.
#[tracing::instrument(skip(run), fields(policy = %run.policy))]
fn run_report(fields: &[Field], run: RunArgs) -> Result<()> {
    let data = run.data.unwrap_or_else(|| {
        std::env::var("WINE_STATS_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/wine.json"))
    });
    info!(data = %data.display(), "Loading dataset");

    let report = analyze_file(&data, fields, run.policy)
        .with_context(|| format!("failed to summarize {}", data.display()))?;
    print_pretty(&report);

    match (run.format, run.output) {
        (Format::Csv, Some(path)) => append_record(&path, &report)?,
        (format, Some(path)) => {
            std::fs::write(&path, render(format, &report)?)?;
            debug!(path, "Report written");
        }
        (format, None) => print!("{}", render(format, &report)?),
    }

    Ok(())
}

fn render(format: Format, report: &Report) -> Result<String> {
    Ok(match format {
        Format::Table => render_report(report),
        Format::Json => to_json(report)? + "\n",
        Format::Csv => to_csv(report)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_data_help_names_bundled_sample() {
        let cmd = Cli::command();
        let report = cmd.find_subcommand("report").unwrap();
        let data = report
            .get_arguments()
            .find(|a| a.get_id() == "data")
            .unwrap();
        let help = data.get_help().unwrap().to_string();

        assert!(help.contains("data/wine.json"));
        assert!(help.contains("10-row sample"));
    }

    #[test]
    fn test_stats_parses_field_and_policy() {
        let cli = Cli::try_parse_from([
            "wine_stats", "stats", "--field", "gamma", "--policy", "permissive",
        ])
        .unwrap();

        match cli.command {
            Commands::Stats { field, run } => {
                assert_eq!(field, Field::Gamma);
                assert_eq!(run.policy, Policy::Permissive);
                assert!(run.data.is_none());
            }
            _ => panic!("expected the stats subcommand"),
        }
    }
}
