//! Markdown conversion
//!
//! One-way, lossy converters between stored block arrays and Markdown text.
//! Inline styling (bold, colors, links) flattens to plain text; numbered
//! items always emit a literal `1. ` marker and rely on renderers to
//! renumber.

use serde_json::Value;

use crate::blocks::{self, BlockKind};

/// Render a block array as Markdown
pub fn blocks_to_markdown(blocks: &[Value]) -> String {
    let mut markdown = String::new();

    for block in blocks {
        let text = blocks::block_text(block);
        match blocks::classify(block) {
            BlockKind::Paragraph => {
                if !text.is_empty() {
                    markdown.push_str(&text);
                    markdown.push_str("\n\n");
                }
            }
            BlockKind::Heading { level } => {
                for _ in 0..level {
                    markdown.push('#');
                }
                markdown.push(' ');
                markdown.push_str(if text.is_empty() { "Untitled" } else { &text });
                markdown.push_str("\n\n");
            }
            BlockKind::BulletItem => {
                markdown.push_str("- ");
                markdown.push_str(&text);
                markdown.push('\n');
            }
            BlockKind::NumberedItem => {
                markdown.push_str("1. ");
                markdown.push_str(&text);
                markdown.push('\n');
            }
            BlockKind::Image { url, alt } => {
                markdown.push_str(&format!("![{}]({})\n\n", alt, url));
            }
            BlockKind::Other(_) => {
                if !text.is_empty() {
                    markdown.push_str(&text);
                    markdown.push_str("\n\n");
                }
            }
        }
    }

    markdown.trim().to_string()
}

/// Parse Markdown text into a block array, line by line
///
/// Recognizes `#`/`##`/`###` headings, `-`/`*` bullets, and `1. `-style
/// numbered items; everything else is a paragraph. Blank lines become empty
/// paragraphs which the trailing filter drops again when the input has any
/// real content, so a whole-empty input still yields one block.
pub fn markdown_to_blocks(text: &str) -> Vec<Value> {
    let mut result: Vec<Value> = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            result.push(blocks::paragraph(""));
        } else if let Some(rest) = line.strip_prefix("### ") {
            result.push(blocks::heading(3, rest));
        } else if let Some(rest) = line.strip_prefix("## ") {
            result.push(blocks::heading(2, rest));
        } else if let Some(rest) = line.strip_prefix("# ") {
            result.push(blocks::heading(1, rest));
        } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            result.push(blocks::bullet_item(rest));
        } else if let Some(rest) = strip_numbered_prefix(line) {
            result.push(blocks::numbered_item(rest));
        } else {
            result.push(blocks::paragraph(line));
        }
    }

    let has_content = result.iter().any(|b| !blocks::is_empty_paragraph(b));
    if has_content {
        result.retain(|b| !blocks::is_empty_paragraph(b));
    } else {
        result.truncate(1);
    }
    if result.is_empty() {
        result.push(blocks::paragraph(""));
    }
    result
}

/// Strip a `<digits>. ` prefix, returning the rest of the line
fn strip_numbered_prefix(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}
