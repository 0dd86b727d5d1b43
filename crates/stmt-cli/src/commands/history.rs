//! History command - browse saved extractions.

use clap::{Args, Subcommand};
use console::style;

use stmt_core::{Field, HistoryStore};

use super::config::{history_path, load_config};

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    command: HistoryCommand,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List recent extractions, newest first
    List {
        /// Number of entries to show (default: history.limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show one saved extraction as JSON
    Show {
        /// Entry id
        id: u64,
    },
}

pub async fn run(args: HistoryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = HistoryStore::open(history_path(&config))?;

    match args.command {
        HistoryCommand::List { limit } => {
            let entries = store.recent(limit.unwrap_or(config.history.limit))?;
            if entries.is_empty() {
                println!("{} No saved extractions.", style("ℹ").blue());
                return Ok(());
            }

            for entry in entries {
                println!(
                    "{:>4}  {}  {}  {}  {}",
                    style(entry.id).bold(),
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    entry.file_name,
                    entry.result.get(Field::CardIssuer),
                    entry.result.get(Field::TotalDue),
                );
            }
        }
        HistoryCommand::Show { id } => {
            let entry = store.get(id)?;
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
    }

    Ok(())
}
