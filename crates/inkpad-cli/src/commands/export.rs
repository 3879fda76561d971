//! Export and import command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use inkpad_core::convert::{export_content, import_content};
use inkpad_core::{ExportFormat, KeyValueStore, Registry, WriteOutcome};

use crate::output::Output;

use super::resolve_id_or_current;

/// Export a document in an interchange format
///
/// Writes to the given file, or to stdout when no path is passed.
pub fn export<S: KeyValueStore>(
    registry: &Registry<S>,
    reference: Option<&str>,
    format: ExportFormat,
    out_path: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let id = resolve_id_or_current(registry, reference)?;
    let Some(content) = registry.content(&id)? else {
        bail!("document {} has no content to export", id);
    };

    let rendered = export_content(&content, format)
        .with_context(|| format!("cannot export {} as {}", id, format))?;

    match out_path {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            output.success(&format!("Exported {} to {}", id, path.display()));
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Import interchange text into a document
pub fn import<S: KeyValueStore>(
    registry: &mut Registry<S>,
    reference: Option<&str>,
    format: ExportFormat,
    file: &PathBuf,
    output: &Output,
) -> Result<()> {
    let id = resolve_id_or_current(registry, reference)?;
    let input = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let content = import_content(&input, format)?;

    match registry.set_content(&id, &content)? {
        WriteOutcome::Written => {
            output.success(&format!("Imported {} into {}", file.display(), id));
            Ok(())
        }
        WriteOutcome::Rejected => bail!("imported content failed validation"),
        WriteOutcome::VerifyFailed => bail!("write did not verify; storage may be full"),
    }
}
