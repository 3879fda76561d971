//! Document registry
//!
//! The `Registry` is the single authority for the document catalog, the
//! current-document pointer, and every per-document content record. Nothing
//! else in the crate touches the key-value store.
//!
//! ## Stored keys
//!
//! - `documents-list`: JSON array of [`Document`]
//! - `current-document-id`: raw id string (not JSON-wrapped)
//! - `document-<id>`: the content payload for one document
//! - `editor-content`: pre-multi-document content, migrated on first load
//!
//! ## Failure semantics
//!
//! Malformed stored JSON is treated as absent, never surfaced to callers.
//! Content writes validate shape first and verify the write by reading it
//! back; a failed write leaves prior content untouched and is reported
//! through [`WriteOutcome`], not an error.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::models::{generate_id, Document, DocumentKind};
use crate::storage::{KeyValueStore, StorageError};

/// Keys used in the persisted key space
pub mod keys {
    pub const DOCUMENTS_LIST: &str = "documents-list";
    pub const CURRENT_DOCUMENT: &str = "current-document-id";
    pub const DOCUMENT_PREFIX: &str = "document-";
    pub const LEGACY_EDITOR_CONTENT: &str = "editor-content";
}

/// Storage key of a document's content record
pub fn content_key(id: &str) -> String {
    format!("{}{}", keys::DOCUMENT_PREFIX, id)
}

/// Errors that can escape registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("document not found: {id}")]
    NotFound { id: String },

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of a content write attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Content was validated, written, and verified
    Written,
    /// Content failed shape validation; nothing was written
    Rejected,
    /// The store accepted the write but read-back did not match
    /// (quota-style failure); prior content may or may not survive
    VerifyFailed,
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written)
    }
}

/// The document catalog plus the current-document pointer
pub struct Registry<S: KeyValueStore> {
    store: S,
    documents: Vec<Document>,
    current_id: Option<String>,
}

impl<S: KeyValueStore> Registry<S> {
    /// Load the registry from a store
    ///
    /// If no catalog exists, performs the one-time legacy migration (an old
    /// `editor-content` record becomes a single note document) or, failing
    /// that, creates the default Welcome document. A current pointer that
    /// references a missing document is repaired to the first entry.
    pub fn load(store: S) -> Result<Self, RegistryError> {
        let mut registry = Self {
            store,
            documents: Vec::new(),
            current_id: None,
        };

        match registry.read_catalog()? {
            Some(documents) => registry.documents = documents,
            None => registry.initialize_catalog()?,
        }

        registry.restore_current_pointer()?;
        Ok(registry)
    }

    /// The ordered document catalog
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// The current-document pointer
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// The current document's catalog entry
    pub fn current(&self) -> Option<&Document> {
        self.current_id
            .as_deref()
            .and_then(|id| self.document(id))
    }

    /// Look up a catalog entry by id
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying store
    ///
    /// For adjacent records (preferences); registry-owned keys must go
    /// through the methods above.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Create a document of the given kind and make it current
    pub fn create(&mut self, kind: DocumentKind) -> Result<Document, RegistryError> {
        let doc = Document::with_id(self.fresh_id(), kind);

        self.documents.push(doc.clone());
        self.persist_catalog()?;
        self.store.set(&content_key(&doc.id), kind.empty_content())?;
        self.set_current_unchecked(&doc.id)?;

        debug!(id = %doc.id, kind = %kind, "created document");
        Ok(doc)
    }

    /// Rename a document
    ///
    /// A title that trims to empty is a logged no-op: the caller keeps the
    /// previous title.
    pub fn rename(&mut self, id: &str, new_title: &str) -> Result<(), RegistryError> {
        let title = new_title.trim();
        if title.is_empty() {
            warn!(id, "ignoring rename to empty title");
            return Ok(());
        }

        let Some(doc) = self.documents.iter_mut().find(|d| d.id == id) else {
            return Err(RegistryError::NotFound { id: id.to_string() });
        };
        doc.set_title(title);
        self.persist_catalog()
    }

    /// Delete a document and its content record
    ///
    /// If the deleted document was current, the pointer moves to the first
    /// remaining document, or clears when the catalog becomes empty.
    pub fn delete(&mut self, id: &str) -> Result<(), RegistryError> {
        let before = self.documents.len();
        self.documents.retain(|d| d.id != id);
        if self.documents.len() == before {
            debug!(id, "delete of unknown document ignored");
            return Ok(());
        }

        self.persist_catalog()?;
        self.store.remove(&content_key(id))?;

        if self.current_id.as_deref() == Some(id) {
            match self.documents.first().map(|d| d.id.clone()) {
                Some(next) => self.set_current_unchecked(&next)?,
                None => {
                    self.current_id = None;
                    self.store.remove(keys::CURRENT_DOCUMENT)?;
                }
            }
        }
        Ok(())
    }

    /// Duplicate a document: new id, title suffixed, fresh timestamps,
    /// content copied byte-for-byte. The copy becomes current.
    pub fn duplicate(&mut self, id: &str) -> Result<Document, RegistryError> {
        let source = self
            .document(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })?;
        let content = self
            .store
            .get(&content_key(id))?
            .unwrap_or_else(|| DocumentKind::Note.empty_content().to_string());

        let mut copy = Document::with_id(self.fresh_id(), source.kind);
        copy.title = format!("{} (Copy)", source.title);

        self.documents.push(copy.clone());
        self.persist_catalog()?;
        self.store.set(&content_key(&copy.id), &content)?;
        self.set_current_unchecked(&copy.id)?;

        Ok(copy)
    }

    /// Make an existing document current and persist the pointer
    pub fn set_current(&mut self, id: &str) -> Result<(), RegistryError> {
        if self.document(id).is_none() {
            return Err(RegistryError::NotFound { id: id.to_string() });
        }
        self.set_current_unchecked(id)
    }

    /// Raw read of a document's content record
    ///
    /// `None` distinguishes "no content yet" from empty content.
    pub fn content(&self, id: &str) -> Result<Option<String>, RegistryError> {
        Ok(self.store.get(&content_key(id))?)
    }

    /// Validated write of a document's content record
    ///
    /// The payload must parse as JSON and be a block array, a `{nodes,edges}`
    /// graph, or a `{columns,rows}` table. The write is read back and
    /// compared to detect storage failures. On success the owning document's
    /// `updated_at` is refreshed and the catalog persisted.
    pub fn set_content(&mut self, id: &str, content: &str) -> Result<WriteOutcome, RegistryError> {
        if id.is_empty() || content.is_empty() {
            warn!(id, "rejecting content write with missing id or content");
            return Ok(WriteOutcome::Rejected);
        }
        if !is_valid_payload(content) {
            warn!(id, "rejecting content write with invalid payload shape");
            return Ok(WriteOutcome::Rejected);
        }

        let key = content_key(id);
        self.store.set(&key, content)?;

        let written = self.store.get(&key)?;
        if written.as_deref() != Some(content) {
            error!(id, "content write did not verify on read-back");
            return Ok(WriteOutcome::VerifyFailed);
        }

        if let Some(doc) = self.documents.iter_mut().find(|d| d.id == id) {
            doc.touch();
            self.persist_catalog()?;
        }
        Ok(WriteOutcome::Written)
    }

    /// Re-read catalog and pointer after an external change to either key
    ///
    /// Returns whether the key belonged to the registry and triggered a
    /// reload. Per-document content keys are left to the next read.
    pub fn handle_external_change(&mut self, key: &str) -> Result<bool, RegistryError> {
        if key != keys::DOCUMENTS_LIST && key != keys::CURRENT_DOCUMENT {
            return Ok(false);
        }

        self.documents = self.read_catalog()?.unwrap_or_default();
        self.current_id = self
            .store
            .get(keys::CURRENT_DOCUMENT)?
            .filter(|id| self.documents.iter().any(|d| &d.id == id))
            .or_else(|| self.documents.first().map(|d| d.id.clone()));
        Ok(true)
    }

    // ==================== internals ====================

    fn read_catalog(&self) -> Result<Option<Vec<Document>>, RegistryError> {
        let Some(raw) = self.store.get(keys::DOCUMENTS_LIST)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Vec<Document>>(&raw) {
            Ok(documents) => Ok(Some(documents)),
            Err(err) => {
                warn!(%err, "stored document catalog is malformed, treating as absent");
                Ok(None)
            }
        }
    }

    /// First-load path: migrate the single-document format or seed defaults
    fn initialize_catalog(&mut self) -> Result<(), RegistryError> {
        if let Some(legacy) = self.store.get(keys::LEGACY_EDITOR_CONTENT)? {
            if serde_json::from_str::<Value>(&legacy).is_ok() {
                let id = format!("doc-{}-migrated", chrono::Utc::now().timestamp_millis());
                let mut doc = Document::with_id(id, DocumentKind::Note);
                doc.title = "Migrated Document".to_string();

                self.documents.push(doc.clone());
                self.persist_catalog()?;
                self.store.set(&content_key(&doc.id), &legacy)?;
                self.set_current_unchecked(&doc.id)?;
                self.store.remove(keys::LEGACY_EDITOR_CONTENT)?;

                debug!(id = %doc.id, "migrated legacy single-document content");
                return Ok(());
            }
            warn!("legacy editor-content is not valid JSON, ignoring it");
        }

        let id = format!("doc-{}-default", chrono::Utc::now().timestamp_millis());
        let mut doc = Document::with_id(id, DocumentKind::Note);
        doc.title = "Welcome".to_string();

        self.documents.push(doc.clone());
        self.persist_catalog()?;
        self.store
            .set(&content_key(&doc.id), &welcome_content())?;
        self.set_current_unchecked(&doc.id)?;

        debug!(id = %doc.id, "created default welcome document");
        Ok(())
    }

    /// Validate the stored pointer against the catalog, repairing it to the
    /// first entry (or clearing it) when it dangles
    fn restore_current_pointer(&mut self) -> Result<(), RegistryError> {
        let stored = self.store.get(keys::CURRENT_DOCUMENT)?;
        if let Some(id) = stored {
            if self.documents.iter().any(|d| d.id == id) {
                self.current_id = Some(id);
                return Ok(());
            }
            warn!(id, "current-document pointer references a missing document");
        }

        match self.documents.first().map(|d| d.id.clone()) {
            Some(first) => self.set_current_unchecked(&first)?,
            None => self.current_id = None,
        }
        Ok(())
    }

    fn set_current_unchecked(&mut self, id: &str) -> Result<(), RegistryError> {
        self.current_id = Some(id.to_string());
        self.store.set(keys::CURRENT_DOCUMENT, id)?;
        Ok(())
    }

    fn persist_catalog(&mut self) -> Result<(), RegistryError> {
        let json = serde_json::to_string(&self.documents)?;
        self.store.set(keys::DOCUMENTS_LIST, &json)?;
        Ok(())
    }

    /// Generate an id and re-roll while it collides with the catalog
    fn fresh_id(&self) -> String {
        loop {
            let id = generate_id();
            if self.document(&id).is_none() {
                return id;
            }
        }
    }
}

/// Generic payload validation for content writes
///
/// Accepts the three stored shapes: a block array, a node graph, or a table.
pub fn is_valid_payload(content: &str) -> bool {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return false;
    };
    match value {
        Value::Array(_) => true,
        Value::Object(obj) => {
            (obj.contains_key("nodes") && obj.contains_key("edges"))
                || (obj.contains_key("columns") && obj.contains_key("rows"))
        }
        _ => false,
    }
}

/// The fixed sample content seeded into the default Welcome document
fn welcome_content() -> String {
    let blocks = serde_json::json!([
        {
            "type": "heading",
            "props": { "level": 1 },
            "content": [
                { "type": "text", "text": "Welcome to ", "styles": {} },
                { "type": "text", "text": "Inkpad", "styles": { "textColor": "yellow" } }
            ]
        },
        {
            "type": "paragraph",
            "content": "A minimal local-first editor for notes, canvases, and tables. Everything you write stays on this device."
        },
        {
            "type": "heading",
            "props": { "level": 2 },
            "content": "Features"
        },
        {
            "type": "bulletListItem",
            "content": [
                { "type": "text", "text": "Rich text editing with ", "styles": {} },
                { "type": "text", "text": "formatting", "styles": { "bold": true } }
            ]
        },
        {
            "type": "bulletListItem",
            "content": "Multiple documents in the sidebar"
        },
        {
            "type": "bulletListItem",
            "content": "Export to JSON, Markdown, or HTML"
        },
        {
            "type": "bulletListItem",
            "content": "QR code sharing between devices"
        },
        {
            "type": "heading",
            "props": { "level": 2 },
            "content": "Getting Started"
        },
        {
            "type": "numberedListItem",
            "content": "Create a new page with the New page button"
        },
        {
            "type": "numberedListItem",
            "content": "Pick a kind: note, canvas, or database"
        },
        {
            "type": "numberedListItem",
            "content": "Use the share icon to generate a QR code"
        }
    ]);
    blocks.to_string()
}
