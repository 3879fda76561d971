//! Share command handlers

use std::path::Path;

use anyhow::{bail, Result};

use inkpad_core::share::{self, ShareError};
use inkpad_core::{KeyValueStore, Registry};

use crate::output::Output;

use super::resolve_id_or_current;

/// Encode a document as a share URL and print it
pub fn url<S: KeyValueStore>(
    registry: &Registry<S>,
    reference: Option<&str>,
    origin: &str,
    output: &Output,
) -> Result<()> {
    let link = encode(registry, reference, origin)?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "url": link.url,
                "length": link.url.len(),
                "content_length": link.content_len,
                "warning": link.warning,
            })
        );
    } else {
        println!("{}", link.url);
        if let Some(warning) = &link.warning {
            if !output.is_quiet() {
                eprintln!("⚠ {}", warning);
            }
        }
    }
    Ok(())
}

/// Encode a document and render its QR code
///
/// Renders an SVG file when a path is passed, otherwise draws the code in
/// the terminal.
pub fn qr<S: KeyValueStore>(
    registry: &Registry<S>,
    reference: Option<&str>,
    origin: &str,
    out_path: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let link = encode(registry, reference, origin)?;

    if let Some(warning) = &link.warning {
        if !output.is_quiet() {
            eprintln!("⚠ {}", warning);
        }
    }

    match out_path {
        Some(path) => {
            let svg = share::render_svg(&link.url)?;
            std::fs::write(path, svg)?;
            output.success(&format!("QR code written to {}", path.display()));
        }
        None => {
            println!("{}", share::render_terminal(&link.url)?);
            output.message(&format!(
                "{} characters - scan to open the shared note",
                link.url.len()
            ));
        }
    }
    Ok(())
}

/// Decode a share link (or bare fragment) and print its content
pub fn decode(link: &str, output: &Output) -> Result<()> {
    match share::decode(share::fragment_of(link)) {
        Ok(note) => {
            if output.is_json() {
                println!(
                    "{}",
                    serde_json::json!({ "title": note.title, "text": note.text })
                );
            } else {
                if !output.is_quiet() {
                    println!("# {}", note.title);
                    println!();
                }
                println!("{}", note.text);
            }
            Ok(())
        }
        Err(err @ ShareError::Decode) => {
            // A corrupt link is a display state, not a crash
            output.message(&err.to_string());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn encode<S: KeyValueStore>(
    registry: &Registry<S>,
    reference: Option<&str>,
    origin: &str,
) -> Result<inkpad_core::ShareLink> {
    let id = resolve_id_or_current(registry, reference)?;
    let Some(content) = registry.content(&id)? else {
        bail!("document {} has no content to share", id);
    };

    match share::encode(&content, origin) {
        Ok(link) => Ok(link),
        Err(err) => {
            let suggestions = err.suggestions();
            if suggestions.is_empty() {
                Err(err.into())
            } else {
                let tips: Vec<String> =
                    suggestions.iter().map(|s| format!("  - {}", s)).collect();
                bail!("{}\n{}", err, tips.join("\n"))
            }
        }
    }
}
