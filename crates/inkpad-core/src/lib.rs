//! Inkpad Core Library
//!
//! This crate provides the core functionality for Inkpad, a local-first
//! editor for rich-text notes, node-graph canvases, and tabular databases.
//!
//! # Architecture
//!
//! All state persists through a synchronous key-value store; the registry
//! is its sole owner. Editing surfaces are external collaborators reached
//! through the [`switch::EditorHost`] trait.
//!
//! # Quick Start
//!
//! ```text
//! let store = SqliteStore::open(&config.store_path())?;
//! let mut registry = Registry::load(store)?;
//!
//! // Create a document and write content
//! let doc = registry.create(DocumentKind::Note)?;
//! registry.set_content(&doc.id, r#"[{"type":"paragraph","content":"hi"}]"#)?;
//!
//! // Share it
//! let content = registry.content(&doc.id)?.unwrap();
//! let link = share::encode(&content, &config.share_origin)?;
//! ```
//!
//! # Modules
//!
//! - `registry`: document catalog and content records (main entry point)
//! - `switch`: save-before-switch controller binding an editing surface
//! - `storage`: the key-value persistence trait and its backends
//! - `models`: document catalog entry and kind
//! - `blocks`: block classification and text extraction
//! - `convert`: Markdown/HTML/JSON converters
//! - `share`: share-link codec and QR rendering
//! - `prefs`: adjacent UI preference records
//! - `config`: application configuration

pub mod blocks;
pub mod config;
pub mod convert;
pub mod models;
pub mod prefs;
pub mod registry;
pub mod share;
pub mod storage;
pub mod switch;

pub use config::Config;
pub use convert::{ConvertError, ExportFormat};
pub use models::{Document, DocumentKind};
pub use registry::{Registry, RegistryError, WriteOutcome};
pub use share::{ShareError, ShareLink};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError, StorageResult};
pub use switch::{Binding, EditorHost, SwitchController};
