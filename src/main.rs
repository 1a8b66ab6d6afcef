//! Binary entry point for listkeep.
//!
//! This binary provides the CLI interface for the listkeep list store.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context as _;
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use listkeep::config::{BackendKind, ListkeepConfig};
use listkeep::storage::{FilesystemBackend, MemoryBackend, PersistenceBackend, SqliteBackend};
use listkeep::{DocumentStore, InsertPosition, Item, ItemId, ListStore};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Listkeep - a write-through persisted list store.
#[derive(Parser)]
#[command(name = "listkeep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Data directory override.
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Backend override: sqlite, file, or memory.
    #[arg(short, long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Add an item to the list.
    Add {
        /// The item text.
        text: String,

        /// Insert at the front of the list instead of appending.
        #[arg(long)]
        prepend: bool,
    },

    /// Print the list.
    List,

    /// Remove an item by id.
    Remove {
        /// The item id.
        id: String,
    },

    /// Clear the list.
    Clear,

    /// Manage the single text document.
    Doc {
        #[command(subcommand)]
        action: DocAction,
    },
}

/// Document subcommands.
#[derive(Subcommand)]
enum DocAction {
    /// Save text as the document content.
    Save {
        /// The document text.
        text: String,
    },

    /// Print the document content.
    Show,

    /// Delete the document.
    Delete,

    /// Print document metadata.
    Info,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run_command(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Installs the tracing subscriber. `--verbose` lowers the filter to debug.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration, applying CLI overrides.
fn load_config(cli: &Cli) -> anyhow::Result<ListkeepConfig> {
    // Explicit path, then environment override, then default locations.
    let mut config = if let Some(path) = cli.config.as_deref() {
        ListkeepConfig::load_from_file(std::path::Path::new(path))?
    } else if let Ok(path) = std::env::var("LISTKEEP_CONFIG_PATH") {
        if path.trim().is_empty() {
            ListkeepConfig::load_default()
        } else {
            ListkeepConfig::load_from_file(std::path::Path::new(&path))?
        }
    } else {
        ListkeepConfig::load_default()
    };

    if let Some(dir) = &cli.data_dir {
        config.data_dir.clone_from(dir);
    }
    if let Some(backend) = cli.backend.as_deref() {
        config.backend = backend.parse()?;
    }

    Ok(config)
}

/// Runs the selected command.
fn run_command(cli: Cli, config: &ListkeepConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Add { text, prepend } => cmd_add(config, &text, prepend),
        Commands::List => cmd_list(config),
        Commands::Remove { id } => cmd_remove(config, &id),
        Commands::Clear => cmd_clear(config),
        Commands::Doc { action } => match action {
            DocAction::Save { text } => cmd_doc_save(config, &text),
            DocAction::Show => cmd_doc_show(config),
            DocAction::Delete => cmd_doc_delete(config),
            DocAction::Info => cmd_doc_info(config),
        },
    }
}

/// Builds the backend for the list value.
fn list_backend(config: &ListkeepConfig) -> anyhow::Result<Box<dyn PersistenceBackend>> {
    let backend: Box<dyn PersistenceBackend> = match config.backend {
        BackendKind::Sqlite => Box::new(
            SqliteBackend::open(config.data_dir.join("listkeep.db"), &config.list_key)
                .context("opening sqlite backend")?,
        ),
        BackendKind::File => Box::new(
            FilesystemBackend::new(&config.data_dir, &format!("{}.json", config.list_key))
                .context("opening file backend")?,
        ),
        BackendKind::Memory => Box::new(MemoryBackend::new()),
    };
    Ok(backend)
}

/// Builds the backend for the document value.
fn document_backend(config: &ListkeepConfig) -> anyhow::Result<Box<dyn PersistenceBackend>> {
    let backend: Box<dyn PersistenceBackend> = match config.backend {
        BackendKind::Sqlite => Box::new(
            SqliteBackend::open(config.data_dir.join("listkeep.db"), &config.document_name)
                .context("opening sqlite backend")?,
        ),
        BackendKind::File => Box::new(
            FilesystemBackend::new(&config.data_dir, &config.document_name)
                .context("opening file backend")?,
        ),
        BackendKind::Memory => Box::new(MemoryBackend::new()),
    };
    Ok(backend)
}

/// Builds the list store from configuration.
fn open_list_store(config: &ListkeepConfig) -> anyhow::Result<ListStore> {
    Ok(ListStore::new(list_backend(config)?).with_decode_policy(config.decode_policy))
}

/// Add command.
fn cmd_add(config: &ListkeepConfig, text: &str, prepend: bool) -> anyhow::Result<()> {
    let store = open_list_store(config)?;

    let position = if prepend {
        InsertPosition::Prepend
    } else {
        config.default_position
    };

    let item = store.add(text, position)?;

    println!("Item added:");
    println!("  ID: {}", item.id);
    println!("  Created: {}", format_timestamp(item.created_at));

    Ok(())
}

/// List command.
fn cmd_list(config: &ListkeepConfig) -> anyhow::Result<()> {
    let store = open_list_store(config)?;
    let items = store.load()?;

    if items.is_empty() {
        println!("No items saved");
        return Ok(());
    }

    for (index, item) in items.iter().enumerate() {
        print_item(index + 1, item);
    }

    Ok(())
}

/// Remove command.
fn cmd_remove(config: &ListkeepConfig, id: &str) -> anyhow::Result<()> {
    let store = open_list_store(config)?;
    store.remove(&ItemId::new(id))?;

    println!("Item removed: {id}");
    Ok(())
}

/// Clear command.
fn cmd_clear(config: &ListkeepConfig) -> anyhow::Result<()> {
    let store = open_list_store(config)?;
    store.clear()?;

    println!("List cleared");
    Ok(())
}

/// Document save command.
fn cmd_doc_save(config: &ListkeepConfig, text: &str) -> anyhow::Result<()> {
    let doc = DocumentStore::new(document_backend(config)?);
    doc.save(text)?;

    println!("Document saved ({} bytes)", text.len());
    Ok(())
}

/// Document show command.
fn cmd_doc_show(config: &ListkeepConfig) -> anyhow::Result<()> {
    let doc = DocumentStore::new(document_backend(config)?);

    match doc.read()? {
        Some(content) => println!("{content}"),
        None => println!("(no document saved)"),
    }

    Ok(())
}

/// Document delete command.
fn cmd_doc_delete(config: &ListkeepConfig) -> anyhow::Result<()> {
    let doc = DocumentStore::new(document_backend(config)?);
    doc.delete()?;

    println!("Document deleted");
    Ok(())
}

/// Document info command.
fn cmd_doc_info(config: &ListkeepConfig) -> anyhow::Result<()> {
    let doc = DocumentStore::new(document_backend(config)?);
    let info = doc.info()?;

    println!("Exists: {}", info.exists);
    println!("Size: {} bytes", info.size);

    Ok(())
}

/// Prints one list item.
fn print_item(index: usize, item: &Item) {
    println!(
        "{index:>3}. {}  [{}]  {}",
        item.text,
        item.id,
        format_timestamp(item.created_at)
    );
}

/// Formats a Unix timestamp for display.
fn format_timestamp(ts: u64) -> String {
    let ts = i64::try_from(ts).unwrap_or(0);
    Utc.timestamp_opt(ts, 0)
        .single()
        .map_or_else(|| "unknown".to_string(), |dt| dt.to_rfc3339())
}
