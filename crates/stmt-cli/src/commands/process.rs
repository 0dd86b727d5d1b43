//! Process command - extract fields from a single statement file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use stmt_core::export;
use stmt_core::{ExtractionResult, HistoryStore, PdfTextReader, StatementParser, StmtConfig};

use super::config::{history_path, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (.txt OCR text or text-layer .pdf)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Save the extraction to the history file
    #[arg(long)]
    save: bool,

    /// Also write the source text beside the output
    #[arg(long)]
    raw: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading text...");
    pb.set_position(10);
    let text = read_statement_text(&args.input, &config)?;

    pb.set_message("Extracting fields...");
    pb.set_position(60);
    let parser = StatementParser::with_config(config.extraction.clone());
    let report = parser.parse(&text);

    pb.finish_and_clear();

    let output = render(&report.result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.raw {
        write_raw_text(&args, &text)?;
    }

    if args.save {
        let store = HistoryStore::open(history_path(&config))?;
        let entry = store.append(&file_name(&args.input), &report.result, &text)?;
        eprintln!(
            "{} Saved as history entry {}",
            style("✓").green(),
            entry.id
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Load the text a statement file carries.
///
/// `.txt` files are already-OCRed text; `.pdf` files must carry a text
/// layer. Anything else is rejected.
pub fn read_statement_text(path: &Path, config: &StmtConfig) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "txt" => Ok(fs::read_to_string(path)?),
        "pdf" => Ok(PdfTextReader::read_file(path, config.pdf.clone())?),
        "" => anyhow::bail!("unsupported file type: {}", path.display()),
        other => anyhow::bail!("unsupported file type: .{}", other),
    }
}

/// Render a record in the requested format.
pub fn render(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(export::to_json(result)?),
        OutputFormat::Csv => Ok(export::to_csv(result)?),
        OutputFormat::Text => Ok(export::to_text(result)),
    }
}

/// Final path component, for history entries and summary rows.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_raw_text(args: &ProcessArgs, text: &str) -> anyhow::Result<()> {
    match &args.output {
        Some(output_path) => {
            let raw_path = raw_text_path(output_path);
            fs::write(&raw_path, text)?;
            println!(
                "{} Source text written to {}",
                style("✓").green(),
                raw_path.display()
            );
        }
        None => eprintln!("{}", text),
    }
    Ok(())
}

fn raw_text_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string());
    output.with_file_name(format!("{}.raw.txt", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        let err = read_statement_text(Path::new("statement.docx"), &StmtConfig::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "unsupported file type: .docx");
    }

    #[test]
    fn test_raw_text_path() {
        assert_eq!(
            raw_text_path(Path::new("out/march.json")),
            PathBuf::from("out/march.raw.txt")
        );
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/tmp/in/march.pdf")), "march.pdf");
    }
}
