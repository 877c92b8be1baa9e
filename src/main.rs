use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod decode;
mod error;
mod fields;
mod headers;
mod ingest;
mod models;
mod normalize;
mod report;
mod risk;
mod summary;
mod weekly;

use config::IngestConfig;

#[derive(Parser)]
#[command(name = "cohort-ingest")]
#[command(about = "Normalize cohort tracking workbooks into student records", long_about = None)]
struct Cli {
    /// Log filter directive, e.g. `info` or `cohort_ingest=debug`
    #[arg(long, global = true, env = "COHORT_INGEST_LOG", default_value = "warn")]
    log_level: String,

    /// Required header names that must appear in row 2 for a sheet to be read
    #[arg(long, global = true, env = "COHORT_MIN_HEADER_MATCHES", default_value_t = 8)]
    min_header_matches: usize,

    /// Columns searched after a week's session columns for its remaining labels
    #[arg(long, global = true, env = "COHORT_BLOCK_LOOKAHEAD", default_value_t = 4)]
    lookahead: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a workbook and summarize the records found
    Ingest {
        #[arg(long)]
        file: PathBuf,
        /// Print the parsed cohort as JSON
        #[arg(long)]
        json: bool,
    },
    /// List students whose final status marks them at risk
    AtRisk {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        week: Option<u32>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let config = IngestConfig::default()
        .with_min_header_matches(cli.min_header_matches)
        .with_block_lookahead(cli.lookahead);
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid ingest configuration")?;

    match cli.command {
        Commands::Ingest { file, json } => {
            let result = ingest::ingest_file(&file, &config)
                .await
                .with_context(|| format!("failed to ingest {}", file.display()))?;

            if json {
                let parsed = summary::ParsedCohort::from_result(&result);
                println!("{}", serde_json::to_string_pretty(&parsed)?);
                return Ok(());
            }

            let processed = result.processed_sheets();
            println!(
                "Parsed {} student records from {} sheet(s).",
                result.students.len(),
                processed.len()
            );
            let subjects = summary::subjects(&result.students);
            if !subjects.is_empty() {
                println!("Subjects: {}", subjects.join(", "));
            }
            let skipped = result.skipped_sheets();
            if !skipped.is_empty() {
                println!("Skipped: {}", skipped.join(", "));
            }
        }
        Commands::AtRisk {
            file,
            subject,
            limit,
        } => {
            let result = ingest::ingest_file(&file, &config)
                .await
                .with_context(|| format!("failed to ingest {}", file.display()))?;
            let students = risk::filter_by_subject(&result.students, subject.as_deref());
            let (at_risk, _) = risk::partition_by_risk(&students);

            if at_risk.is_empty() {
                println!("No students flagged at risk.");
                return Ok(());
            }

            println!("At risk students ({} of {}):", at_risk.len(), students.len());
            for student in at_risk.iter().take(limit) {
                println!(
                    "- {} ({}, {}) {}",
                    student.name.as_deref().unwrap_or("Unknown Student"),
                    student.course.as_deref().unwrap_or("Unknown Course"),
                    student.student_id.as_deref().unwrap_or("no id"),
                    student.final_status.as_deref().unwrap_or("Unknown")
                );
            }
        }
        Commands::Report {
            file,
            subject,
            week,
            out,
        } => {
            let result = ingest::ingest_file(&file, &config)
                .await
                .with_context(|| format!("failed to ingest {}", file.display()))?;
            let filter = report::ReportFilter {
                subject: subject.as_deref(),
                week,
            };
            let report = report::build_report(&result, &filter, chrono::Utc::now());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
