//! Document command handlers

use anyhow::{Context, Result};
use serde_json::Value;

use inkpad_core::convert::{self, blocks_to_markdown};
use inkpad_core::{
    DocumentKind, EditorHost, KeyValueStore, Registry, SwitchController,
};

use crate::output::Output;

use super::{resolve_id, resolve_id_or_current};

/// Host that renders bound content to the terminal
///
/// Stands in for the editing surface when switching documents from the CLI:
/// notes render as Markdown, canvases and tables as a summary line.
struct TerminalHost<'a> {
    output: &'a Output,
    kind: DocumentKind,
}

impl EditorHost for TerminalHost<'_> {
    fn bind(&mut self, initial_content: Option<&str>) {
        let Some(content) = initial_content else {
            self.output.message("(empty document)");
            return;
        };

        match self.kind {
            DocumentKind::Note => {
                let blocks: Vec<Value> = serde_json::from_str(content).unwrap_or_default();
                let markdown = blocks_to_markdown(&blocks);
                if markdown.is_empty() {
                    self.output.message("(empty document)");
                } else {
                    self.output.message(&markdown);
                }
            }
            DocumentKind::Canvas => {
                let parsed: Value = serde_json::from_str(content).unwrap_or(Value::Null);
                let nodes = parsed["nodes"].as_array().map(Vec::len).unwrap_or(0);
                let edges = parsed["edges"].as_array().map(Vec::len).unwrap_or(0);
                self.output
                    .message(&format!("canvas: {} node(s), {} edge(s)", nodes, edges));
            }
            DocumentKind::Database => {
                let parsed: Value = serde_json::from_str(content).unwrap_or(Value::Null);
                let columns = parsed["columns"].as_array().map(Vec::len).unwrap_or(0);
                let rows = parsed["rows"].as_array().map(Vec::len).unwrap_or(0);
                self.output
                    .message(&format!("database: {} column(s), {} row(s)", columns, rows));
            }
        }
    }
}

/// Create a new document and switch to it
pub fn create<S: KeyValueStore>(
    registry: &mut Registry<S>,
    kind: DocumentKind,
    title: Option<String>,
    output: &Output,
) -> Result<()> {
    let doc = registry.create(kind)?;
    if let Some(title) = title {
        registry.rename(&doc.id, &title)?;
    }
    let doc = registry
        .document(&doc.id)
        .context("created document vanished")?;

    output.success(&format!("Created {} '{}' ({})", doc.kind, doc.title, doc.id));
    if output.is_quiet() {
        println!("{}", doc.id);
    }
    Ok(())
}

/// List the document catalog
pub fn list<S: KeyValueStore>(registry: &Registry<S>, output: &Output) -> Result<()> {
    output.print_documents(registry.documents(), registry.current_id());
    Ok(())
}

/// Switch the current document and render it
pub fn open<S: KeyValueStore>(
    registry: &mut Registry<S>,
    reference: &str,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(registry, reference)?;
    let kind = registry
        .document(&id)
        .map(|d| d.kind)
        .unwrap_or_default();
    registry.set_current(&id)?;

    let mut controller = SwitchController::new(inkpad_core::prefs::auto_save(registry.store()));
    let mut host = TerminalHost { output, kind };
    controller.switch_to(registry, &mut host, Some(&id))?;
    controller.unbind(registry, &mut host)?;

    output.success(&format!("Opened {}", id));
    Ok(())
}

/// Show one document's metadata
pub fn show<S: KeyValueStore>(
    registry: &Registry<S>,
    reference: Option<&str>,
    output: &Output,
) -> Result<()> {
    let id = resolve_id_or_current(registry, reference)?;
    let doc = registry
        .document(&id)
        .with_context(|| format!("no document {}", id))?;
    output.print_document(doc, registry.current_id() == Some(id.as_str()));
    Ok(())
}

/// Rename a document
pub fn rename<S: KeyValueStore>(
    registry: &mut Registry<S>,
    reference: &str,
    title: &str,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(registry, reference)?;
    if title.trim().is_empty() {
        output.message("Title unchanged (empty titles are ignored).");
        return Ok(());
    }
    registry.rename(&id, title)?;
    output.success(&format!("Renamed {} to '{}'", id, title.trim()));
    Ok(())
}

/// Delete a document
pub fn delete<S: KeyValueStore>(
    registry: &mut Registry<S>,
    reference: &str,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(registry, reference)?;
    registry.delete(&id)?;
    output.success(&format!("Deleted {}", id));
    if let Some(current) = registry.current_id() {
        output.message(&format!("Current document is now {}", current));
    }
    Ok(())
}

/// Duplicate a document
pub fn duplicate<S: KeyValueStore>(
    registry: &mut Registry<S>,
    reference: &str,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(registry, reference)?;
    let copy = registry.duplicate(&id)?;
    output.success(&format!("Duplicated {} as '{}' ({})", id, copy.title, copy.id));
    if output.is_quiet() {
        println!("{}", copy.id);
    }
    Ok(())
}

/// Reset a note document to a single empty paragraph
pub fn clear<S: KeyValueStore>(
    registry: &mut Registry<S>,
    reference: Option<&str>,
    output: &Output,
) -> Result<()> {
    let id = resolve_id_or_current(registry, reference)?;
    let outcome = registry.set_content(&id, &convert::empty_note_content())?;
    if !outcome.is_written() {
        anyhow::bail!("could not clear {}: write was {:?}", id, outcome);
    }
    output.success(&format!("Cleared {}", id));
    Ok(())
}
