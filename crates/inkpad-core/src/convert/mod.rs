//! Content format converters
//!
//! Lossy one-way converters between the stored block representation and the
//! plain-text interchange formats (Markdown, HTML), plus the import paths
//! that turn interchange text back into storable block JSON. Converters
//! never panic on structurally unexpected blocks; they skip or degrade to
//! paragraph text.

mod html;
mod markdown;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

pub use html::{blocks_to_html, escape_html, html_to_blocks};
pub use markdown::{blocks_to_markdown, markdown_to_blocks};

use crate::blocks;

/// Interchange formats supported by export and import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
    Html,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Html => "html",
        }
    }

    /// Conventional file extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "html" => Ok(ExportFormat::Html),
            other => Err(format!(
                "unknown format '{}' (expected json, markdown, or html)",
                other
            )),
        }
    }
}

/// Errors from the conversion boundary
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Import input did not match the named format
    #[error("Invalid {format} format")]
    InvalidFormat { format: &'static str },

    /// Import produced no blocks
    #[error("No content to import")]
    Empty,

    /// The stored content is not a block array (canvas or table documents
    /// cannot be exported as text)
    #[error("document content is not a block array")]
    NotBlockContent,
}

/// Render stored content in an interchange format
///
/// JSON export passes the stored payload through verbatim; Markdown and HTML
/// require note content (a block array).
pub fn export_content(content: &str, format: ExportFormat) -> Result<String, ConvertError> {
    match format {
        ExportFormat::Json => Ok(content.to_string()),
        ExportFormat::Markdown => Ok(blocks_to_markdown(&parse_blocks(content)?)),
        ExportFormat::Html => Ok(blocks_to_html(&parse_blocks(content)?)),
    }
}

/// Parse interchange text into storable block JSON
pub fn import_content(input: &str, format: ExportFormat) -> Result<String, ConvertError> {
    let result = match format {
        ExportFormat::Json => {
            let value: Value = serde_json::from_str(input)
                .map_err(|_| ConvertError::InvalidFormat { format: "JSON" })?;
            let Value::Array(parsed) = value else {
                return Err(ConvertError::InvalidFormat { format: "JSON" });
            };
            parsed
        }
        ExportFormat::Markdown => markdown_to_blocks(input),
        ExportFormat::Html => html_to_blocks(input),
    };

    if result.is_empty() {
        return Err(ConvertError::Empty);
    }
    Ok(Value::Array(result).to_string())
}

/// The payload written when a document is cleared: one empty paragraph
pub fn empty_note_content() -> String {
    Value::Array(vec![blocks::paragraph("")]).to_string()
}

fn parse_blocks(content: &str) -> Result<Vec<Value>, ConvertError> {
    let value: Value =
        serde_json::from_str(content).map_err(|_| ConvertError::NotBlockContent)?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ConvertError::NotBlockContent),
    }
}
