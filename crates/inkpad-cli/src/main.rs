//! Inkpad CLI
//!
//! Command-line interface for Inkpad - local-first documents, canvases,
//! and tables.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use inkpad_core::{Config, DocumentKind, ExportFormat, Registry, SqliteStore};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "inkpad")]
#[command(about = "Inkpad - local-first documents, canvases, and tables")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage documents
    Doc {
        #[command(subcommand)]
        command: DocCommands,
    },
    /// Export a document as json, markdown, or html
    Export {
        /// Output format
        format: ExportFormat,
        /// Document id, prefix, or title (defaults to current)
        #[arg(long)]
        id: Option<String>,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Import json, markdown, or html into a document
    Import {
        /// Input format
        format: ExportFormat,
        /// File to read
        file: PathBuf,
        /// Document id, prefix, or title (defaults to current)
        #[arg(long)]
        id: Option<String>,
    },
    /// Share a document as a QR-scannable link
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show store status and document counts
    Status,
}

#[derive(Subcommand)]
enum DocCommands {
    /// Create a new document and make it current
    #[command(alias = "add")]
    New {
        /// Document kind: note, canvas, or database
        #[arg(default_value = "note")]
        kind: DocumentKind,
        /// Initial title
        #[arg(short, long)]
        title: Option<String>,
    },
    /// List all documents
    #[command(alias = "ls")]
    List,
    /// Switch to a document and render it
    Open {
        /// Document id, prefix, or title
        id: String,
    },
    /// Show document metadata
    Show {
        /// Document id, prefix, or title (defaults to current)
        id: Option<String>,
    },
    /// Rename a document
    Rename {
        /// Document id, prefix, or title
        id: String,
        /// New title
        title: String,
    },
    /// Delete a document
    #[command(alias = "rm")]
    Delete {
        /// Document id, prefix, or title
        id: String,
    },
    /// Duplicate a document
    Duplicate {
        /// Document id, prefix, or title
        id: String,
    },
    /// Reset a document to a single empty paragraph
    Clear {
        /// Document id, prefix, or title (defaults to current)
        id: Option<String>,
    },
}

#[derive(Subcommand)]
enum ShareCommands {
    /// Print the share URL
    Url {
        /// Document id, prefix, or title (defaults to current)
        #[arg(long)]
        id: Option<String>,
    },
    /// Render the share link as a QR code
    Qr {
        /// Document id, prefix, or title (defaults to current)
        #[arg(long)]
        id: Option<String>,
        /// Write an SVG file instead of drawing in the terminal
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Decode a share link or fragment
    Decode {
        /// Full URL or bare fragment
        link: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, share_origin)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(&output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, &output)
            }
        };
    }

    let config = Config::load()?;
    let store = SqliteStore::open(&config.store_path())?;
    let mut registry = Registry::load(store)?;

    match cli.command {
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Doc { command } => handle_doc_command(command, &mut registry, &output),
        Commands::Export { format, id, out } => commands::export::export(
            &registry,
            id.as_deref(),
            format,
            out.as_deref(),
            &output,
        ),
        Commands::Import { format, file, id } => {
            commands::export::import(&mut registry, id.as_deref(), format, &file, &output)
        }
        Commands::Share { command } => match command {
            ShareCommands::Url { id } => {
                commands::share::url(&registry, id.as_deref(), &config.share_origin, &output)
            }
            ShareCommands::Qr { id, out } => commands::share::qr(
                &registry,
                id.as_deref(),
                &config.share_origin,
                out.as_deref(),
                &output,
            ),
            ShareCommands::Decode { link } => commands::share::decode(&link, &output),
        },
        Commands::Status => commands::status::show(&registry, &config, &output),
    }
}

fn handle_doc_command(
    command: DocCommands,
    registry: &mut Registry<SqliteStore>,
    output: &Output,
) -> Result<()> {
    match command {
        DocCommands::New { kind, title } => commands::doc::create(registry, kind, title, output),
        DocCommands::List => commands::doc::list(registry, output),
        DocCommands::Open { id } => commands::doc::open(registry, &id, output),
        DocCommands::Show { id } => commands::doc::show(registry, id.as_deref(), output),
        DocCommands::Rename { id, title } => commands::doc::rename(registry, &id, &title, output),
        DocCommands::Delete { id } => commands::doc::delete(registry, &id, output),
        DocCommands::Duplicate { id } => commands::doc::duplicate(registry, &id, output),
        DocCommands::Clear { id } => commands::doc::clear(registry, id.as_deref(), output),
    }
}
