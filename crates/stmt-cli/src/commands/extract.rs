//! Extract command - parse OCR text piped on stdin.

use std::io::Read;

use clap::Args;
use tracing::info;

use stmt_core::StatementParser;

use super::config::load_config;
use super::process::{render, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;

    let report = StatementParser::with_config(config.extraction).parse(&text);
    info!(
        "Detected {} fields in {}ms",
        report.result.detected_count(),
        report.processing_time_ms
    );

    println!("{}", render(&report.result, args.format)?);

    Ok(())
}
