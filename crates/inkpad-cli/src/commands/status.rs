//! Status command handler

use anyhow::Result;

use inkpad_core::{Config, DocumentKind, KeyValueStore, Registry};

use crate::output::{Output, OutputFormat};

/// Show store location, document counts, and the current document
pub fn show<S: KeyValueStore>(
    registry: &Registry<S>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let docs = registry.documents();
    let notes = docs.iter().filter(|d| d.kind == DocumentKind::Note).count();
    let canvases = docs
        .iter()
        .filter(|d| d.kind == DocumentKind::Canvas)
        .count();
    let databases = docs
        .iter()
        .filter(|d| d.kind == DocumentKind::Database)
        .count();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "store": config.store_path(),
                    "documents": docs.len(),
                    "notes": notes,
                    "canvases": canvases,
                    "databases": databases,
                    "current": registry.current_id(),
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", docs.len());
        }
        OutputFormat::Human => {
            println!("Store:     {}", config.store_path().display());
            println!(
                "Documents: {} ({} note, {} canvas, {} database)",
                docs.len(),
                notes,
                canvases,
                databases
            );
            match registry.current() {
                Some(doc) => println!("Current:   {} ({})", doc.title, doc.id),
                None => println!("Current:   (none)"),
            }
        }
    }

    Ok(())
}
