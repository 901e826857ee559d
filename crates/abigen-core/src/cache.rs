//! Struct cache file (`structs.lock.json`).
//!
//! The cache records every struct definition produced by earlier runs
//! into the same output directory. It is loaded into the registry before
//! extraction, so a later run cannot redefine a struct name that an
//! earlier run fixed, even if the current inputs never mention it.

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::diagnostic::GeneratorError;
use crate::registry::{StructDef, StructRegistry};

/// File name of the cache inside the output directory.
pub const CACHE_FILE_NAME: &str = "structs.lock.json";

/// The cache file format version.
pub const CACHE_FILE_VERSION: &str = "1.0";

/// On-disk form of the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructCacheFile {
    /// Cache file format version.
    pub version: String,

    /// Generator version that wrote this file.
    #[serde(rename = "generatorVersion")]
    pub generator_version: String,

    /// Every struct, sorted by name.
    pub structs: Vec<StructDef>,
}

impl StructCacheFile {
    /// Snapshot of a registry.
    pub fn from_registry(registry: &StructRegistry, generator_version: &str) -> Self {
        Self {
            version: CACHE_FILE_VERSION.to_string(),
            generator_version: generator_version.to_string(),
            structs: registry.iter().cloned().collect(),
        }
    }

    /// Rebuilds a registry, applying the conflict check to every entry.
    pub fn into_registry(self) -> Result<StructRegistry, GeneratorError> {
        let mut registry = StructRegistry::new();
        for def in self.structs {
            registry.insert(def)?;
        }
        Ok(registry)
    }
}

/// Loads the cache at `path`.
///
/// A missing file is the normal first-run state and yields an empty registry.
pub fn load(path: &Path) -> Result<StructRegistry, GeneratorError> {
    if !path.exists() {
        return Ok(StructRegistry::new());
    }

    let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e.to_string()))?;

    let cache: StructCacheFile =
        serde_json::from_str(&content).map_err(|e| GeneratorError::CacheParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    cache.into_registry()
}

/// Writes a full snapshot of `registry` to `path`, replacing any previous file.
pub fn save(path: &Path, registry: &StructRegistry) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GeneratorError::io(parent, e.to_string()))?;
    }

    let cache = StructCacheFile::from_registry(registry, env!("CARGO_PKG_VERSION"));
    let mut content = serde_json::to_string_pretty(&cache).map_err(|e| {
        GeneratorError::io(path, format!("Failed to serialize struct cache: {}", e))
    })?;
    content.push('\n');

    std::fs::write(path, content).map_err(|e| GeneratorError::io(path, e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StructField;
    use tempfile::TempDir;

    fn sample_registry() -> StructRegistry {
        let mut registry = StructRegistry::new();
        registry
            .insert(StructDef::new(
                "Transaction",
                vec![
                    StructField::new("timestamp", "U256"),
                    StructField::new("entrypoint", "Address"),
                    StructField::new("data", "Vec<u8>"),
                ],
                false,
            ))
            .unwrap();
        registry
            .insert(StructDef::new(
                "Deposit",
                vec![StructField::new("amount", "u128")],
                true,
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_cache_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join(CACHE_FILE_NAME);

        let registry = sample_registry();
        save(&path, &registry).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, registry);
        let tx = loaded.get("Transaction").unwrap();
        let names: Vec<&str> = tx.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["timestamp", "entrypoint", "data"]);
        assert!(loaded.get("Deposit").unwrap().is_event);
    }

    #[test]
    fn test_load_nonexistent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nonexistent.lock.json");

        let registry = load(&path).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_file_is_sorted_and_readable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CACHE_FILE_NAME);
        save(&path, &sample_registry()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let deposit = content.find("\"Deposit\"").unwrap();
        let transaction = content.find("\"Transaction\"").unwrap();
        assert!(deposit < transaction);
        assert!(content.contains("\"isEvent\": true"));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_corrupt_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CACHE_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load(&path),
            Err(GeneratorError::CacheParseFailed { .. })
        ));
    }

    #[test]
    fn test_conflicting_entries_in_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CACHE_FILE_NAME);
        std::fs::write(
            &path,
            r#"{
  "version": "1.0",
  "generatorVersion": "0.1.0",
  "structs": [
    { "name": "A", "fields": [{ "name": "x", "type": "u8" }] },
    { "name": "A", "fields": [{ "name": "x", "type": "u16" }] }
  ]
}"#,
        )
        .unwrap();

        assert!(matches!(
            load(&path),
            Err(GeneratorError::StructConflict { ref name, .. }) if name == "A"
        ));
    }
}
