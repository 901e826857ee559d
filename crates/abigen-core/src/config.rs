//! Generator configuration.

use std::path::PathBuf;

use crate::cache::CACHE_FILE_NAME;

/// Configuration for the binding generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// ABI files or directories to read.
    pub inputs: Vec<PathBuf>,

    /// Directory to write generated Rust code and the struct cache.
    pub out_dir: PathBuf,

    /// Name of the emitted module, used in generated docs.
    pub package: String,

    /// Logical name of the contract set; names the shared structs file.
    pub name: String,

    /// Crate path the generated code imports its runtime types from.
    pub runtime_crate: String,

    /// Fail on ABI types without a Rust rendering instead of emitting a placeholder.
    pub strict_types: bool,
}

impl GeneratorConfig {
    /// Location of the struct cache, fixed relative to the output directory.
    pub fn cache_path(&self) -> PathBuf {
        self.out_dir.join(CACHE_FILE_NAME)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            inputs: vec![PathBuf::from("abi")],
            out_dir: PathBuf::from("src/bindings"),
            package: "bindings".to_string(),
            name: "contracts".to_string(),
            runtime_crate: "abigen_runtime".to_string(),
            strict_types: true,
        }
    }
}
