//! # abigen
//!
//! Generates strongly-typed Rust bindings from contract ABI descriptions.
//! Every struct-shaped tuple found in the inputs gets one de-duplicated
//! declaration, shared by all contracts of a run and pinned across runs by
//! a struct cache in the output directory.
//!
//! ## Architecture
//!
//! ```text
//! ABI files (.abi / .json)
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Frontend   │  JSON → Type Model
//! │  (ABI → IR)  │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐     ┌──────────────────┐
//! │   Extract    │◄────│ structs.lock.json │
//! │ (IR → defs)  │────►│  (struct cache)   │
//! └──────┬───────┘     └──────────────────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Contract handles, events, structs
//! │ (IR → Rust)  │
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use abigen_core::{Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig {
//!     inputs: vec!["abi".into()],
//!     out_dir: "src/bindings".into(),
//!     ..GeneratorConfig::default()
//! };
//!
//! let result = Generator::new(config).generate()?;
//! println!("{} structs", result.structs);
//! ```

pub mod cache;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod extract;
pub mod frontend;
pub mod ident;
pub mod ir;
pub mod registry;

use std::path::PathBuf;

pub use config::GeneratorConfig;
pub use diagnostic::GeneratorError;
pub use extract::{extract, Extractor};
pub use registry::{StructDef, StructField, StructRegistry};

/// Orchestrates loading, extraction, rendering and writing.
pub struct Generator {
    config: GeneratorConfig,
}

/// Outcome of a successful [`Generator::generate`].
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Contract names, in input order.
    pub contracts: Vec<String>,
    /// Structs in the registry after the run, cached ones included.
    pub structs: usize,
    /// Structs first seen in this run.
    pub new_structs: usize,
    /// Every file written, the cache included.
    pub files: Vec<PathBuf>,
}

/// Outcome of a successful [`Generator::check`].
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub contracts: Vec<String>,
    /// Structs loaded from the cache.
    pub cached_structs: usize,
    /// Structs the inputs would add to the cache.
    pub new_structs: usize,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates bindings for every artifact found under the configured inputs.
    pub fn generate(&self) -> Result<GenerateResult, GeneratorError> {
        let artifacts = frontend::load_artifacts(&self.config.inputs)?;
        self.generate_artifacts(&artifacts)
    }

    /// Generates bindings for already loaded artifacts.
    ///
    /// This runs the full pipeline:
    /// 1. Load the struct cache into a fresh registry
    /// 2. Extract structs from every artifact
    /// 3. Render every file in memory
    /// 4. Write the files, then the updated cache
    ///
    /// A conflict or render error stops the run before anything is written.
    pub fn generate_artifacts(
        &self,
        artifacts: &[ir::ContractArtifact],
    ) -> Result<GenerateResult, GeneratorError> {
        let cache_path = self.config.cache_path();
        let cache_existed = cache_path.exists();

        // Phase 1-2: Registry
        let (registry, _, new_structs) = self.build_registry(artifacts)?;

        // Phase 3: Render
        let generated = codegen::generate(artifacts, &registry, &self.config)?;

        // Phase 4: Write
        let mut files = self.write_output(&generated)?;
        cache::save(&cache_path, &registry)?;
        if !cache_existed {
            eprintln!("📋 Created struct cache: {}", cache_path.display());
        }
        files.push(cache_path);

        Ok(GenerateResult {
            contracts: artifacts.iter().map(|a| a.name.clone()).collect(),
            structs: registry.len(),
            new_structs,
            files,
        })
    }

    /// Runs extraction against the cache without writing anything.
    pub fn check(&self) -> Result<CheckResult, GeneratorError> {
        let artifacts = frontend::load_artifacts(&self.config.inputs)?;
        let (registry, cached_structs, new_structs) = self.build_registry(&artifacts)?;
        codegen::check_names(&artifacts, &registry, &self.config)?;

        Ok(CheckResult {
            contracts: artifacts.iter().map(|a| a.name.clone()).collect(),
            cached_structs,
            new_structs,
        })
    }

    /// Loads the cache and extracts every artifact into it, in input order.
    ///
    /// Returns the registry with the number of cached and of newly added structs.
    fn build_registry(
        &self,
        artifacts: &[ir::ContractArtifact],
    ) -> Result<(StructRegistry, usize, usize), GeneratorError> {
        let mut registry = StructRegistry::new();
        let cached = registry.merge(cache::load(&self.config.cache_path())?)?;

        let mut extractor = Extractor::new(&mut registry, self.config.strict_types);
        for artifact in artifacts {
            extractor.extract_abi(&artifact.abi)?;
        }
        let added = extractor.added();

        Ok((registry, cached, added))
    }

    /// Writes generated code to the output directory.
    fn write_output(&self, generated: &codegen::GeneratedCode) -> Result<Vec<PathBuf>, GeneratorError> {
        std::fs::create_dir_all(&self.config.out_dir)
            .map_err(|e| GeneratorError::io(&self.config.out_dir, e.to_string()))?;

        let mut written = Vec::with_capacity(generated.files.len());
        for (filename, content) in &generated.files {
            let path = self.config.out_dir.join(filename);
            std::fs::write(&path, content).map_err(|e| GeneratorError::io(&path, e.to_string()))?;
            written.push(path);
        }

        Ok(written)
    }
}
