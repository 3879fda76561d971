//! UI preference records
//!
//! Preference keys live in the same key-value store as the documents but
//! outside the registry's catalog: raw string values, written by the
//! settings surface and the canvas controls. Unknown or missing stored
//! values fall back to defaults rather than erroring.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::storage::{KeyValueStore, StorageResult};

pub const EDITOR_WIDTH_KEY: &str = "editor-width";
pub const AUTO_SAVE_KEY: &str = "editor-autoSave";
pub const SIDEBAR_OPEN_KEY: &str = "sidebar-open";
pub const PROPERTIES_PANEL_OPEN_KEY: &str = "properties-panel-open";
pub const EDGE_STYLE_KEY: &str = "edge-style";

/// Editor column width
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorWidth {
    Narrow,
    #[default]
    Medium,
    Wide,
    Full,
}

impl EditorWidth {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorWidth::Narrow => "narrow",
            EditorWidth::Medium => "medium",
            EditorWidth::Wide => "wide",
            EditorWidth::Full => "full",
        }
    }
}

impl fmt::Display for EditorWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EditorWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "narrow" => Ok(EditorWidth::Narrow),
            "medium" => Ok(EditorWidth::Medium),
            "wide" => Ok(EditorWidth::Wide),
            "full" => Ok(EditorWidth::Full),
            other => Err(format!("unknown editor width '{}'", other)),
        }
    }
}

/// Canvas edge rendering style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeStyle {
    #[default]
    Smoothstep,
    Straight,
    Step,
    Bezier,
}

impl EdgeStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeStyle::Smoothstep => "smoothstep",
            EdgeStyle::Straight => "straight",
            EdgeStyle::Step => "step",
            EdgeStyle::Bezier => "bezier",
        }
    }
}

impl fmt::Display for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EdgeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smoothstep" => Ok(EdgeStyle::Smoothstep),
            "straight" => Ok(EdgeStyle::Straight),
            "step" => Ok(EdgeStyle::Step),
            "bezier" => Ok(EdgeStyle::Bezier),
            other => Err(format!("unknown edge style '{}'", other)),
        }
    }
}

pub fn editor_width<S: KeyValueStore>(store: &S) -> EditorWidth {
    read_parsed(store, EDITOR_WIDTH_KEY)
}

pub fn set_editor_width<S: KeyValueStore>(
    store: &mut S,
    width: EditorWidth,
) -> StorageResult<()> {
    store.set(EDITOR_WIDTH_KEY, width.as_str())
}

/// Whether changes persist on every notification (defaults to on)
pub fn auto_save<S: KeyValueStore>(store: &S) -> bool {
    read_bool(store, AUTO_SAVE_KEY, true)
}

pub fn set_auto_save<S: KeyValueStore>(store: &mut S, enabled: bool) -> StorageResult<()> {
    store.set(AUTO_SAVE_KEY, bool_str(enabled))
}

pub fn sidebar_open<S: KeyValueStore>(store: &S) -> bool {
    read_bool(store, SIDEBAR_OPEN_KEY, true)
}

pub fn set_sidebar_open<S: KeyValueStore>(store: &mut S, open: bool) -> StorageResult<()> {
    store.set(SIDEBAR_OPEN_KEY, bool_str(open))
}

pub fn properties_panel_open<S: KeyValueStore>(store: &S) -> bool {
    read_bool(store, PROPERTIES_PANEL_OPEN_KEY, true)
}

pub fn set_properties_panel_open<S: KeyValueStore>(
    store: &mut S,
    open: bool,
) -> StorageResult<()> {
    store.set(PROPERTIES_PANEL_OPEN_KEY, bool_str(open))
}

pub fn edge_style<S: KeyValueStore>(store: &S) -> EdgeStyle {
    read_parsed(store, EDGE_STYLE_KEY)
}

pub fn set_edge_style<S: KeyValueStore>(store: &mut S, style: EdgeStyle) -> StorageResult<()> {
    store.set(EDGE_STYLE_KEY, style.as_str())
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn read_bool<S: KeyValueStore>(store: &S, key: &str, default: bool) -> bool {
    match store.get(key) {
        Ok(Some(value)) => value == "true",
        Ok(None) => default,
        Err(err) => {
            debug!(key, %err, "preference read failed, using default");
            default
        }
    }
}

fn read_parsed<S: KeyValueStore, T: FromStr + Default>(store: &S, key: &str) -> T {
    match store.get(key) {
        Ok(Some(value)) => value.parse().unwrap_or_default(),
        _ => T::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_on_missing_keys() {
        let store = MemoryStore::new();
        assert_eq!(editor_width(&store), EditorWidth::Medium);
        assert!(auto_save(&store));
        assert!(sidebar_open(&store));
        assert!(properties_panel_open(&store));
        assert_eq!(edge_style(&store), EdgeStyle::Smoothstep);
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();

        set_editor_width(&mut store, EditorWidth::Wide).unwrap();
        assert_eq!(editor_width(&store), EditorWidth::Wide);

        set_auto_save(&mut store, false).unwrap();
        assert!(!auto_save(&store));

        set_edge_style(&mut store, EdgeStyle::Bezier).unwrap();
        assert_eq!(edge_style(&store), EdgeStyle::Bezier);
    }

    #[test]
    fn test_stored_values_match_legacy_format() {
        let mut store = MemoryStore::new();
        set_auto_save(&mut store, true).unwrap();
        set_editor_width(&mut store, EditorWidth::Narrow).unwrap();

        assert_eq!(
            store.get(AUTO_SAVE_KEY).unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(
            store.get(EDITOR_WIDTH_KEY).unwrap().as_deref(),
            Some("narrow")
        );
    }

    #[test]
    fn test_garbage_values_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(EDITOR_WIDTH_KEY, "gigantic").unwrap();
        store.set(EDGE_STYLE_KEY, "wavy").unwrap();
        store.set(AUTO_SAVE_KEY, "yes").unwrap();

        assert_eq!(editor_width(&store), EditorWidth::Medium);
        assert_eq!(edge_style(&store), EdgeStyle::Smoothstep);
        // Anything but the literal "true" reads as false
        assert!(!auto_save(&store));
    }
}
