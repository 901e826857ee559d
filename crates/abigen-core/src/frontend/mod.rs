//! ABI artifact loading.
//!
//! Turns files on disk into [`ContractArtifact`]s:
//! 1. Collect `.abi` and `.json` files from the configured inputs
//! 2. Parse each ABI into the type model
//! 3. Attach bytecode when the artifact carries any

pub mod abi;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::diagnostic::GeneratorError;
use crate::ident::{module_name, sanitize_name};
use crate::ir::ContractArtifact;

pub use abi::{parse_abi, parse_type, AbiEntry, AbiParam};

/// File extensions recognized as ABI artifacts.
pub const ARTIFACT_EXTENSIONS: &[&str] = &["abi", "json"];

/// Loads every artifact reachable from `inputs`.
///
/// Inputs may be files or directories. Directories are walked recursively
/// in file name order; JSON files inside them that do not look like an ABI
/// are skipped. Explicitly named files must parse.
pub fn load_artifacts(inputs: &[PathBuf]) -> Result<Vec<ContractArtifact>, GeneratorError> {
    let mut artifacts = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for input in inputs {
        let candidates = if input.is_dir() {
            collect_dir(input)?
        } else if input.is_file() {
            vec![(input.clone(), true)]
        } else {
            return Err(GeneratorError::io(input, "No such file or directory"));
        };

        for (path, explicit) in candidates {
            let Some(artifact) = load_artifact(&path, explicit)? else {
                continue;
            };

            // Names that only differ in case or separators share output files.
            let module = module_name(&artifact.name);
            if let Some(first) = seen.get(&module) {
                return Err(GeneratorError::DuplicateArtifact {
                    name: artifact.name.clone(),
                    first: first.clone(),
                    second: path,
                });
            }
            seen.insert(module, path);
            artifacts.push(artifact);
        }
    }

    if artifacts.is_empty() {
        return Err(GeneratorError::NoArtifacts);
    }

    Ok(artifacts)
}

fn collect_dir(dir: &Path) -> Result<Vec<(PathBuf, bool)>, GeneratorError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| GeneratorError::io(dir, e.to_string()))?;
        if entry.file_type().is_file() && is_artifact_file(entry.path()) {
            files.push((entry.path().to_path_buf(), false));
        }
    }
    Ok(files)
}

fn is_artifact_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ARTIFACT_EXTENSIONS.contains(&ext))
}

/// Loads one artifact file.
///
/// Returns `Ok(None)` for a non-explicit JSON file that holds no ABI.
pub fn load_artifact(path: &Path, explicit: bool) -> Result<Option<ContractArtifact>, GeneratorError> {
    let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e.to_string()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    if !is_json {
        // Bare `.abi` file, bytecode in a sibling `.bin`.
        let abi = abi::parse_abi_at(&content, path)?;
        return Ok(Some(ContractArtifact {
            name: sanitize_name(&stem),
            abi,
            abi_json: content.trim().to_string(),
            bin: read_sibling_bin(path)?,
            source: path.to_path_buf(),
        }));
    }

    let value: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(_) if !explicit => return Ok(None),
        Err(e) => {
            return Err(GeneratorError::AbiParseFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };

    let (abi_value, bin, name) = match value {
        Value::Array(_) => (value, String::new(), stem),
        Value::Object(mut object) => {
            let Some(abi_value) = object.remove("abi") else {
                if explicit {
                    return Err(GeneratorError::AbiParseFailed {
                        path: path.to_path_buf(),
                        message: "missing `abi` field".to_string(),
                    });
                }
                return Ok(None);
            };
            let bin = object
                .get("bin")
                .or_else(|| object.get("bytecode"))
                .map(bytecode_string)
                .unwrap_or_default();
            let name = object
                .get("contractName")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(stem);
            (abi_value, bin, name)
        }
        _ if !explicit => return Ok(None),
        _ => {
            return Err(GeneratorError::AbiParseFailed {
                path: path.to_path_buf(),
                message: "expected an ABI array or an artifact object".to_string(),
            })
        }
    };

    let abi_json = abi_value.to_string();
    let abi = abi::parse_abi_value(abi_value, path)?;

    Ok(Some(ContractArtifact {
        name: sanitize_name(&name),
        abi,
        abi_json,
        bin: normalize_hex(&bin),
        source: path.to_path_buf(),
    }))
}

/// Reads `<stem>.bin` next to an `.abi` file, if present.
fn read_sibling_bin(path: &Path) -> Result<String, GeneratorError> {
    let bin_path = path.with_extension("bin");
    if !bin_path.exists() {
        return Ok(String::new());
    }
    let bin = std::fs::read_to_string(&bin_path).map_err(|e| GeneratorError::io(&bin_path, e.to_string()))?;
    Ok(normalize_hex(&bin))
}

/// Accepts `"0x.."` or the `{ "object": "0x.." }` form some toolchains emit.
fn bytecode_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(object) => object
            .get("object")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

fn normalize_hex(bin: &str) -> String {
    let hex = bin.trim().trim_start_matches("0x");
    if hex.is_empty() {
        String::new()
    } else {
        format!("0x{}", hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ERC20_ABI: &str = r#"[
      { "type": "function", "name": "balanceOf", "stateMutability": "view",
        "inputs": [{ "name": "owner", "type": "address" }],
        "outputs": [{ "name": "", "type": "uint256" }] }
    ]"#;

    #[test]
    fn test_load_abi_with_sibling_bin() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Token.abi"), ERC20_ABI).unwrap();
        std::fs::write(dir.path().join("Token.bin"), "6080604052\n").unwrap();

        let artifacts = load_artifacts(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].name, "Token");
        assert_eq!(artifacts[0].bin, "0x6080604052");
        assert!(artifacts[0].has_bytecode());
        assert_eq!(artifacts[0].abi.methods.len(), 1);
    }

    #[test]
    fn test_file_stem_becomes_identifier() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("my-token.abi"), ERC20_ABI).unwrap();

        let artifacts = load_artifacts(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(artifacts[0].name, "my_token");
        assert_eq!(crate::ident::type_name(&artifacts[0].name), "MyToken");
    }

    #[test]
    fn test_names_differing_in_case_are_duplicates() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::create_dir_all(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("a/Token.abi"), ERC20_ABI).unwrap();
        std::fs::write(dir.path().join("b/token.abi"), ERC20_ABI).unwrap();

        let err = load_artifacts(&[dir.path().to_path_buf()]).unwrap_err();
        match err {
            GeneratorError::DuplicateArtifact { name, first, second } => {
                assert_eq!(name, "token");
                assert!(first.ends_with("a/Token.abi"));
                assert!(second.ends_with("b/token.abi"));
            }
            other => panic!("expected DuplicateArtifact, got {:?}", other),
        }
    }

    #[test]
    fn test_load_json_artifact_object() {
        let dir = TempDir::new().unwrap();
        let artifact = format!(
            r#"{{ "contractName": "Vault", "abi": {}, "bytecode": {{ "object": "0x00" }} }}"#,
            ERC20_ABI
        );
        std::fs::write(dir.path().join("vault.json"), artifact).unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{ "name": "x" }"#).unwrap();

        let artifacts = load_artifacts(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].name, "Vault");
        assert_eq!(artifacts[0].bin, "0x00");
        assert!(artifacts[0].abi_json.starts_with('['));
    }

    #[test]
    fn test_explicit_file_without_abi_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, r#"{ "name": "x" }"#).unwrap();

        assert!(matches!(
            load_artifacts(&[path]),
            Err(GeneratorError::AbiParseFailed { .. })
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::create_dir_all(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("a/Token.abi"), ERC20_ABI).unwrap();
        std::fs::write(dir.path().join("b/Token.json"), ERC20_ABI).unwrap();

        assert!(matches!(
            load_artifacts(&[dir.path().to_path_buf()]),
            Err(GeneratorError::DuplicateArtifact { ref name, .. }) if name == "Token"
        ));
    }

    #[test]
    fn test_no_artifacts() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_artifacts(&[dir.path().to_path_buf()]),
            Err(GeneratorError::NoArtifacts)
        ));
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_artifacts(&[dir.path().join("missing")]),
            Err(GeneratorError::IoError { .. })
        ));
    }
}
