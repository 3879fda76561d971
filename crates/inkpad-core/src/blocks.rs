//! Block inspection helpers
//!
//! Note content is an array of block objects produced by the editing
//! surface. Blocks arrive with a `type` tag, an optional `props` object, and
//! `content` that is either a plain string, an array of inline runs
//! (`{type:"text", text, styles}`, nested links, ...), or absent. The
//! converters never trust that shape: [`classify`] maps a block to a closed
//! [`BlockKind`] and [`block_text`] flattens whatever text it can find.

use serde_json::{json, Value};

/// Closed classification of a stored block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    /// Heading level 1-6
    Heading { level: u8 },
    BulletItem,
    NumberedItem,
    Image { url: String, alt: String },
    /// Unrecognized `type` tag; converters treat these as paragraph text
    Other(String),
}

/// Classify a block object by its `type` tag
pub fn classify(block: &Value) -> BlockKind {
    let tag = block.get("type").and_then(Value::as_str).unwrap_or("");
    match tag {
        "paragraph" => BlockKind::Paragraph,
        "heading" => {
            let level = block
                .pointer("/props/level")
                .and_then(Value::as_u64)
                .unwrap_or(1)
                .clamp(1, 6) as u8;
            BlockKind::Heading { level }
        }
        "bulletListItem" => BlockKind::BulletItem,
        "numberedListItem" => BlockKind::NumberedItem,
        "image" => {
            let url = block
                .pointer("/props/url")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            let alt = block
                .pointer("/props/altText")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("image")
                .to_string();
            BlockKind::Image { url, alt }
        }
        other => BlockKind::Other(other.to_string()),
    }
}

/// Flatten the text of a block
///
/// Looks at `content` (string or inline-run array), then `children`, then
/// `props.text`, returning the first non-empty result.
pub fn block_text(block: &Value) -> String {
    match block.get("content") {
        Some(Value::String(s)) => return s.clone(),
        Some(content @ Value::Array(_)) => {
            let text = extract_text(content);
            if !text.is_empty() {
                return text;
            }
        }
        _ => {}
    }

    if let Some(children @ Value::Array(_)) = block.get("children") {
        let text = extract_text(children);
        if !text.is_empty() {
            return text;
        }
    }

    block
        .pointer("/props/text")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// Concatenate the text fragments of an inline-content array
///
/// Descends nested `content` arrays in document order with no separator
/// between sibling fragments. Items that match none of the known inline
/// shapes go through [`scavenge_strings`], the explicit degraded branch.
pub fn extract_text(content: &Value) -> String {
    let Some(items) = content.as_array() else {
        return String::new();
    };

    let mut out = String::new();
    for item in items {
        match item {
            Value::String(s) => out.push_str(s),
            Value::Object(obj) => {
                if let Some(text) = obj.get("text").and_then(Value::as_str) {
                    out.push_str(text);
                } else if let Some(nested @ Value::Array(_)) = obj.get("content") {
                    out.push_str(&extract_text(nested));
                } else if let Some(s) = obj.get("content").and_then(Value::as_str) {
                    out.push_str(s);
                } else {
                    out.push_str(&scavenge_strings(item));
                }
            }
            _ => {}
        }
    }
    out
}

/// Degraded extraction: join every string-valued field of an unknown object
///
/// Last resort for inline items with none of the known fields; keeps foreign
/// block payloads from silently losing all their text.
fn scavenge_strings(item: &Value) -> String {
    let Some(obj) = item.as_object() else {
        return String::new();
    };
    let values: Vec<&str> = obj.values().filter_map(Value::as_str).collect();
    values.join(" ")
}

/// Count the image blocks in a block array
pub fn count_images(blocks: &[Value]) -> usize {
    blocks
        .iter()
        .filter(|b| matches!(classify(b), BlockKind::Image { .. }))
        .count()
}

// Constructors used by the importers.

pub fn paragraph(text: &str) -> Value {
    json!({ "type": "paragraph", "content": text })
}

pub fn heading(level: u8, text: &str) -> Value {
    json!({ "type": "heading", "props": { "level": level }, "content": text })
}

pub fn bullet_item(text: &str) -> Value {
    json!({ "type": "bulletListItem", "content": text })
}

pub fn numbered_item(text: &str) -> Value {
    json!({ "type": "numberedListItem", "content": text })
}

pub fn image(url: &str, alt: &str) -> Value {
    json!({ "type": "image", "props": { "url": url, "altText": alt } })
}

/// Whether a block is a paragraph with no visible text
pub fn is_empty_paragraph(block: &Value) -> bool {
    matches!(classify(block), BlockKind::Paragraph) && block_text(block).trim().is_empty()
}
