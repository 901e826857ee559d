//! Generator error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while generating bindings.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum GeneratorError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("I/O failure on '{}': {message}", path.display())]
    #[diagnostic(code(abigen::io::failed))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // ABI Errors
    // =========================================================================
    #[error("Failed to parse ABI in '{}': {message}", path.display())]
    #[diagnostic(
        code(abigen::abi::parse_failed),
        help("ABI files must hold a JSON array of entries, or an object with an `abi` field")
    )]
    AbiParseFailed {
        path: PathBuf,
        message: String,
    },

    #[error("Invalid ABI type: {type_desc}")]
    #[diagnostic(code(abigen::abi::invalid_type))]
    InvalidAbiType {
        type_desc: String,
    },

    #[error("No Rust rendering for ABI type '{type_desc}'")]
    #[diagnostic(
        code(abigen::types::unsupported),
        help("Pass --allow-unsupported to emit a placeholder type instead of failing")
    )]
    UnsupportedType {
        type_desc: String,
    },

    // =========================================================================
    // Struct Errors
    // =========================================================================
    #[error("Struct '{name}' is declared with two different shapes: {existing} vs {incoming}")]
    #[diagnostic(
        code(abigen::structs::conflict),
        help("The first shape is already fixed for this output directory. Rename one of the structs or generate into a separate output directory.")
    )]
    StructConflict {
        name: String,
        existing: String,
        incoming: String,
    },

    #[error("Failed to read struct cache '{}': {message}", path.display())]
    #[diagnostic(
        code(abigen::cache::parse_failed),
        help("Delete the cache with `abigen cache reset --i-know-what-im-doing` if it was edited by hand")
    )]
    CacheParseFailed {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Code Generation Errors
    // =========================================================================
    #[error("Failed to render bindings: {message}")]
    #[diagnostic(code(abigen::codegen::render_failed))]
    RenderFailed {
        message: String,
    },

    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("No ABI artifacts found")]
    #[diagnostic(
        code(abigen::input::no_artifacts),
        help("Point --input at `.abi` or `.json` files, or at a directory containing them")
    )]
    NoArtifacts,

    #[error("Duplicate contract name: {name}")]
    #[diagnostic(code(abigen::input::duplicate_artifact))]
    DuplicateArtifact {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl GeneratorError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }
}
