//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use stmt_core::export::{self, BatchRow};
use stmt_core::{ExtractionResult, StatementParser, StmtConfig};

use super::config::load_config;
use super::process::{file_name, read_statement_text, render, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Result<ExtractionResult, String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(StatementParser::with_config(config.extraction.clone()));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));

    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let semaphore = Arc::clone(&semaphore);
            let parser = Arc::clone(&parser);
            let config = Arc::clone(&config);
            let pb = overall_pb.clone();
            let output_dir = args.output_dir.clone();
            let format = args.format;

            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                let result = tokio::task::spawn_blocking(move || {
                    let file_start = Instant::now();
                    let outcome =
                        process_single_file(&path, &parser, &config, output_dir.as_deref(), format)
                            .map_err(|e| e.to_string());
                    ProcessResult {
                        path,
                        outcome,
                        processing_time_ms: file_start.elapsed().as_millis() as u64,
                    }
                })
                .await?;
                pb.inc(1);
                anyhow::Ok(result)
            })
        })
        .collect();

    // Awaiting in spawn order keeps results in input order.
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await??;
        if let Err(ref message) = result.outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                overall_pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), message);
            }
        }
        debug!(
            "{} processed in {}ms",
            result.path.display(),
            result.processing_time_ms
        );
        results.push(result);
    }

    overall_pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(message) = &result.outcome {
                println!("  - {}: {}", result.path.display(), message);
            }
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    parser: &StatementParser,
    config: &StmtConfig,
    output_dir: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<ExtractionResult> {
    let text = read_statement_text(path, config)?;
    let result = parser.parse(&text).result;

    if let Some(output_dir) = output_dir {
        let output_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("statement");
        let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

        fs::write(&output_path, render(&result, format)?)?;
        debug!("Wrote output to {}", output_path.display());
    }

    Ok(result)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let rows: Vec<BatchRow> = results
        .iter()
        .map(|r| match &r.outcome {
            Ok(result) => BatchRow::ok(file_name(&r.path), result.clone()),
            Err(message) => BatchRow::failed(file_name(&r.path), message.clone()),
        })
        .collect();

    export::write_batch_csv(fs::File::create(path)?, &rows)?;
    Ok(())
}
