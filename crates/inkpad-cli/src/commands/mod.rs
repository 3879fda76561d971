//! Command handlers

pub mod config;
pub mod doc;
pub mod export;
pub mod share;
pub mod status;

use anyhow::{bail, Result};
use inkpad_core::{KeyValueStore, Registry};

/// Resolve a document reference to a full id
///
/// Accepts a full id, a unique id prefix, or an exact title match.
pub fn resolve_id<S: KeyValueStore>(registry: &Registry<S>, reference: &str) -> Result<String> {
    if registry.document(reference).is_some() {
        return Ok(reference.to_string());
    }

    let prefix_matches: Vec<&str> = registry
        .documents()
        .iter()
        .filter(|d| d.id.starts_with(reference))
        .map(|d| d.id.as_str())
        .collect();
    match prefix_matches.as_slice() {
        [single] => return Ok(single.to_string()),
        [] => {}
        _ => bail!("'{}' matches multiple documents, use a longer prefix", reference),
    }

    let title_matches: Vec<&str> = registry
        .documents()
        .iter()
        .filter(|d| d.title == reference)
        .map(|d| d.id.as_str())
        .collect();
    match title_matches.as_slice() {
        [single] => Ok(single.to_string()),
        [] => bail!("no document matching '{}'", reference),
        _ => bail!("'{}' matches multiple documents by title, use the id", reference),
    }
}

/// Resolve an optional reference, defaulting to the current document
pub fn resolve_id_or_current<S: KeyValueStore>(
    registry: &Registry<S>,
    reference: Option<&str>,
) -> Result<String> {
    match reference {
        Some(r) => resolve_id(registry, r),
        None => match registry.current_id() {
            Some(id) => Ok(id.to_string()),
            None => bail!("no current document; pass an id or create one first"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_core::{DocumentKind, MemoryStore};

    fn registry() -> Registry<MemoryStore> {
        Registry::load(MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_resolve_full_id_and_prefix() {
        let registry = registry();
        let id = registry.documents()[0].id.clone();

        assert_eq!(resolve_id(&registry, &id).unwrap(), id);
        assert_eq!(resolve_id(&registry, &id[..8]).unwrap(), id);
    }

    #[test]
    fn test_resolve_by_title() {
        let registry = registry();
        let id = registry.documents()[0].id.clone();
        assert_eq!(resolve_id(&registry, "Welcome").unwrap(), id);
    }

    #[test]
    fn test_resolve_missing() {
        let registry = registry();
        assert!(resolve_id(&registry, "doc-0-nope").is_err());
    }

    #[test]
    fn test_resolve_ambiguous_prefix() {
        let mut registry = registry();
        registry.create(DocumentKind::Note).unwrap();
        // Every id shares the "doc-" prefix
        assert!(resolve_id(&registry, "doc-").is_err());
    }

    #[test]
    fn test_resolve_defaults_to_current() {
        let mut registry = registry();
        let b = registry.create(DocumentKind::Canvas).unwrap().id;
        assert_eq!(resolve_id_or_current(&registry, None).unwrap(), b);
    }
}
