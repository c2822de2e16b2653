//! Adapter collection persistence.
//!
//! The JSON file on disk is the single source of truth. There is no
//! in-process cache: callers re-load before each lookup so that external
//! edits to the file take effect immediately. Reads never fail the caller —
//! a missing or corrupt file degrades to an empty collection, since the
//! scrape path falls back to fresh discovery anyway.

use std::path::Path;

use crate::Error;
use crate::adapter::AdapterCollection;

/// Load the adapter collection from `path`.
///
/// A missing file yields an empty collection silently; an unreadable or
/// unparseable file yields an empty collection with a warning.
pub fn load(path: &Path) -> AdapterCollection {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return AdapterCollection::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read adapter store, starting empty");
            return AdapterCollection::default();
        }
    };

    match serde_json::from_str::<AdapterCollection>(&raw) {
        Ok(collection) => {
            tracing::debug!(path = %path.display(), count = collection.adapters.len(), "loaded adapter store");
            collection
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "corrupt adapter store, starting empty");
            AdapterCollection::default()
        }
    }
}

/// Write the whole collection to `path` as pretty-printed JSON, creating the
/// parent directory if needed.
pub fn save(collection: &AdapterCollection, path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::StoreWrite(format!("create {}: {}", parent.display(), e)))?;
    }

    let json = serde_json::to_string_pretty(collection)
        .map_err(|e| Error::StoreWrite(format!("serialize adapter store: {}", e)))?;

    std::fs::write(path, json).map_err(|e| Error::StoreWrite(format!("write {}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), count = collection.adapters.len(), "saved adapter store");
    Ok(())
}
