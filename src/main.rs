use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fairness_audit::{audit_model, auditable_columns, init_tracing, AuditConfig};

#[derive(Parser)]
#[command(name = "fairness-audit", version, about = "Disparate-impact audit on the UCI Adult census dataset")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download and clean the dataset
    Prepare {
        #[arg(long)]
        url: Option<String>,
        /// Where to write the cleaned CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Train the model and audit one protected attribute
    Audit {
        attribute: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the attributes that can be audited
    Columns,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AuditConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Prepare { url, output } => run_prepare(&config, url, output),
        Command::Audit { attribute, json } => run_audit(&config, &attribute, json),
        Command::Columns => run_columns(&config),
    }
}

#[cfg(feature = "download")]
fn run_prepare(config: &AuditConfig, url: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let url = url.unwrap_or_else(|| config.dataset_url.clone());
    let output = output.unwrap_or_else(|| config.data_path.clone());

    println!("📥 Preparing UCI Adult dataset");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let summary = fairness_audit::prepare::setup_data(&url, config.download_timeout_secs, &output)
        .with_context(|| format!("Failed to prepare dataset from {}", url))?;

    println!("✓ {}", summary.summary());
    println!("✅ Cleaned data saved to {}", output.display());

    Ok(())
}

#[cfg(not(feature = "download"))]
fn run_prepare(_config: &AuditConfig, _url: Option<String>, _output: Option<PathBuf>) -> Result<()> {
    eprintln!("❌ Download support not available!");
    eprintln!("   Rebuild with: cargo build --features download");
    std::process::exit(1);
}

fn run_audit(config: &AuditConfig, attribute: &str, json: bool) -> Result<()> {
    let columns = auditable_columns(&config.data_path, &config.candidate_columns)
        .context("Dataset not available, run `fairness-audit prepare` first")?;

    if !columns.iter().any(|c| c == attribute) {
        anyhow::bail!(
            "Invalid attribute '{}'. Choose one of: {}",
            attribute,
            columns.join(", ")
        );
    }

    let report = audit_model(config, attribute)
        .with_context(|| format!("Audit of '{}' failed", attribute))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("🔍 Fairness audit: {}", report.protected_attribute);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Accuracy:            {}", report.accuracy);
    println!(
        "Privileged group:    {} ({} rows, {} positive)",
        report.privileged_group, report.rows.privileged, report.privileged_rate
    );
    println!(
        "Unprivileged group:  {} ({} rows, {} positive)",
        report.unprivileged_group, report.rows.unprivileged, report.unprivileged_rate
    );
    println!("Disparate impact:    {}", report.disparate_impact);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if report.is_fair {
        println!("✅ Fair (ratio >= {})", report.threshold);
    } else {
        println!("⚠️  Potential bias (ratio < {})", report.threshold);
    }

    Ok(())
}

fn run_columns(config: &AuditConfig) -> Result<()> {
    let columns = auditable_columns(&config.data_path, &config.candidate_columns)
        .context("Dataset not available, run `fairness-audit prepare` first")?;

    for column in columns {
        println!("{}", column);
    }

    Ok(())
}
