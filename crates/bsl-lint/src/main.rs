//! Command-line entry point.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bsl_lint::{Options, run};
use bsl_report::sonar::GenericIssueReport;

/// Static analyzer for 1C:Enterprise (BSL) modules.
///
/// Walks a configuration dump for .bsl modules, analyzes each one, and
/// writes a SonarQube generic-issue JSON report.
#[derive(Parser)]
#[command(name = "bsl-lint", version, about)]
struct Cli {
    /// Root of the configuration source tree
    root: PathBuf,

    /// Path of the JSON report to write
    #[arg(short, long, default_value = "bsl-generic-json.json")]
    output: PathBuf,

    /// Report parameters that are never read nor written
    #[arg(long)]
    strict_params: bool,

    /// Exit with an error when any module fails to parse
    #[arg(long)]
    fail_on_parse_error: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !cli.root.exists() {
        bail!("source root {} does not exist", cli.root.display());
    }

    let summary = run(&cli.root, Options { strict_params: cli.strict_params });
    tracing::info!(
        modules = summary.modules,
        failures = summary.failures,
        issues = summary.issues.len(),
        "analysis finished"
    );

    let report = GenericIssueReport::from_issues(&summary.issues);
    let file = File::create(&cli.output)
        .with_context(|| format!("cannot create report at {}", cli.output.display()))?;
    report
        .write_to(BufWriter::new(file))
        .with_context(|| format!("cannot write report to {}", cli.output.display()))?;

    if cli.fail_on_parse_error && summary.failures > 0 {
        bail!("{} module(s) failed to parse", summary.failures);
    }
    Ok(())
}
