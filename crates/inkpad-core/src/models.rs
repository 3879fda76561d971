//! Data models for Inkpad
//!
//! Defines the document catalog entry and its kind. Content payloads are
//! stored as opaque JSON strings keyed by document id; their shape per kind
//! is validated at the registry boundary, not modeled here.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of content a document holds
///
/// Fixed at creation; determines the content codec and the editing surface.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Rich-text blocks, stored as a JSON array
    // "document" is the pre-rename value still found in old catalogs
    #[serde(alias = "document")]
    #[default]
    Note,
    /// Node graph, stored as `{nodes, edges}`
    Canvas,
    /// Tabular data, stored as `{columns, rows}`
    Database,
}

impl DocumentKind {
    /// The empty content payload written when a document of this kind is created
    pub fn empty_content(&self) -> &'static str {
        match self {
            DocumentKind::Note => "[]",
            DocumentKind::Canvas => r#"{"nodes":[],"edges":[]}"#,
            DocumentKind::Database => r#"{"columns":[],"rows":[]}"#,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Note => "note",
            DocumentKind::Canvas => "canvas",
            DocumentKind::Database => "database",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "note" | "document" => Ok(DocumentKind::Note),
            "canvas" => Ok(DocumentKind::Canvas),
            "database" => Ok(DocumentKind::Database),
            other => Err(format!(
                "unknown document kind '{}' (expected note, canvas, or database)",
                other
            )),
        }
    }
}

/// A document catalog entry
///
/// The content itself lives in a separate `document-<id>` record; this is
/// the metadata the sidebar shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier, immutable after creation
    pub id: String,
    /// Display title
    pub title: String,
    /// Content kind, fixed at creation
    #[serde(rename = "type", default)]
    pub kind: DocumentKind,
    /// When this document was created
    pub created_at: DateTime<Utc>,
    /// When this document was last updated
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Create a new untitled document of the given kind with a fresh id
    pub fn new(kind: DocumentKind) -> Self {
        Self::with_id(generate_id(), kind)
    }

    /// Create a document with a specific id
    pub fn with_id(id: impl Into<String>, kind: DocumentKind) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: "Untitled".to_string(),
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.updated_at = Utc::now();
    }

    /// Mark the document as just modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Generate a fresh document id
///
/// `doc-<unix-millis>-<suffix>`: the millisecond clock keeps ids roughly
/// sortable, the UUID-derived suffix keeps rapid repeated calls within the
/// same millisecond from colliding. The registry still checks the result
/// against the catalog before using it.
pub fn generate_id() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("doc-{}-{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new(DocumentKind::Note);
        assert_eq!(doc.title, "Untitled");
        assert_eq!(doc.kind, DocumentKind::Note);
        assert!(doc.id.starts_with("doc-"));
        assert_eq!(doc.created_at, doc.updated_at);
    }

    #[test]
    fn test_set_title_refreshes_updated_at() {
        let mut doc = Document::new(DocumentKind::Canvas);
        let original_updated = doc.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(10));
        doc.set_title("Renamed");
        assert_eq!(doc.title, "Renamed");
        assert!(doc.updated_at > original_updated);
    }

    #[test]
    fn test_generate_id_format_and_uniqueness() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);

        let parts: Vec<&str> = a.splitn(3, '-').collect();
        assert_eq!(parts[0], "doc");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 9);
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&DocumentKind::Note).unwrap(),
            "\"note\""
        );
        assert_eq!(
            serde_json::to_string(&DocumentKind::Canvas).unwrap(),
            "\"canvas\""
        );

        // Legacy catalogs used "document" for notes
        let kind: DocumentKind = serde_json::from_str("\"document\"").unwrap();
        assert_eq!(kind, DocumentKind::Note);
    }

    #[test]
    fn test_document_serialization_uses_stored_field_names() {
        let doc = Document::new(DocumentKind::Database);
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"type\":\"database\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));

        let parsed: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_document_missing_kind_defaults_to_note() {
        // Catalog entries written before kinds existed carry no "type" field
        let json = r#"{
            "id": "doc-1700000000000-migrated",
            "title": "Migrated Document",
            "createdAt": "2023-11-14T22:13:20Z",
            "updatedAt": "2023-11-14T22:13:20Z"
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.kind, DocumentKind::Note);
    }

    #[test]
    fn test_empty_content_shapes() {
        assert_eq!(DocumentKind::Note.empty_content(), "[]");

        let canvas: serde_json::Value =
            serde_json::from_str(DocumentKind::Canvas.empty_content()).unwrap();
        assert!(canvas.get("nodes").is_some());
        assert!(canvas.get("edges").is_some());

        let database: serde_json::Value =
            serde_json::from_str(DocumentKind::Database.empty_content()).unwrap();
        assert!(database.get("columns").is_some());
        assert!(database.get("rows").is_some());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("note".parse::<DocumentKind>().unwrap(), DocumentKind::Note);
        assert_eq!(
            "canvas".parse::<DocumentKind>().unwrap(),
            DocumentKind::Canvas
        );
        assert_eq!(
            "database".parse::<DocumentKind>().unwrap(),
            DocumentKind::Database
        );
        assert!("spreadsheet".parse::<DocumentKind>().is_err());
    }
}
