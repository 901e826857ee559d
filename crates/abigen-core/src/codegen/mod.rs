//! Rust binding generation from the contract IR.
//!
//! For every contract the generator emits:
//! - A contract handle with call accessors and transaction builders
//! - Event records with topic-filter and log-decoding helpers
//! - The embedded ABI and bytecode
//!
//! Structs shared by all contracts of a run go into one file named after
//! the contract set, and a `mod.rs` ties everything together.

pub mod decl;
pub mod printer;
pub mod rust_types;
mod artifacts;
mod contract;
mod events;
mod index;
mod structs;

use std::collections::{HashMap, HashSet};

use crate::config::GeneratorConfig;
use crate::diagnostic::GeneratorError;
use crate::ident::{
    is_identifier, is_keyword, module_name, rust_ident, to_identifier, to_snake_case, type_name,
};
use crate::ir::{ContractArtifact, Type};
use crate::registry::StructRegistry;

pub use artifacts::generate_artifacts;
pub use contract::generate_contract;
pub use events::generate_events;
pub use index::generate_index;
pub use structs::generate_structs;

/// Type names the structs, contract and events files import from the
/// runtime crate or use from the prelude.
///
/// A struct declared under one of these would shadow or clash with the import.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "Address",
    "BlockNumber",
    "Client",
    "Contract",
    "Detokenize",
    "Error",
    "Hash",
    "I256",
    "Log",
    "Option",
    "Result",
    "Self",
    "String",
    "Token",
    "Tokenize",
    "TopicFilter",
    "TupleReader",
    "Txn",
    "U256",
    "Vec",
];

/// Generated Rust code.
pub struct GeneratedCode {
    /// Map of filename to content.
    pub files: Vec<(String, String)>,
}

/// Renders every file of a run in memory.
///
/// Nothing is written here, so a render error leaves the output directory untouched.
pub fn generate(
    artifacts: &[ContractArtifact],
    registry: &StructRegistry,
    config: &GeneratorConfig,
) -> Result<GeneratedCode, GeneratorError> {
    check_names(artifacts, registry, config)?;

    let ctx = RenderContext::new(registry, config);
    let mut files = Vec::new();

    let structs = generate_structs(&ctx);
    files.push((format!("{}.rs", ctx.structs_module()), printer::print(&structs)));

    for artifact in artifacts {
        let module = ctx.contract_module(&artifact.name);

        let contract = generate_contract(artifact, &ctx)?;
        files.push((format!("{}.rs", module), printer::print(&contract)));

        let events = generate_events(artifact, &ctx)?;
        files.push((format!("{}_events.rs", module), printer::print(&events)));

        let embedded = generate_artifacts(artifact, &ctx);
        files.push((format!("{}_artifacts.rs", module), printer::print(&embedded)));
    }

    let index = generate_index(artifacts, &ctx);
    files.push(("mod.rs".to_string(), printer::print(&index)));

    Ok(GeneratedCode { files })
}

/// Rejects struct, contract and module names the generated files cannot hold.
///
/// Checks that every declared type name is a valid identifier and clear of
/// [`RESERVED_TYPE_NAMES`], that no contract shares its name with a struct,
/// and that no two generated files share a module name.
pub fn check_names(
    artifacts: &[ContractArtifact],
    registry: &StructRegistry,
    config: &GeneratorConfig,
) -> Result<(), GeneratorError> {
    for def in registry.iter() {
        check_type_name(&def.name, "struct", &[])?;
    }

    let structs = RenderContext::new(registry, config).structs_module();
    let mut stems: HashSet<String> = HashSet::from(["mod".to_string(), structs]);
    let mut modules: HashMap<String, &ContractArtifact> = HashMap::new();

    for artifact in artifacts {
        let handle = type_name(&artifact.name);
        check_type_name(&handle, "contract", HANDLE_ALLOWED)?;
        if registry.contains(&handle) {
            return Err(GeneratorError::RenderFailed {
                message: format!("contract `{}` has the same name as a struct", handle),
            });
        }

        let module = module_name(&artifact.name);
        if let Some(first) = modules.get(&module) {
            return Err(GeneratorError::DuplicateArtifact {
                name: artifact.name.clone(),
                first: first.source.clone(),
                second: artifact.source.clone(),
            });
        }
        if is_keyword(&module) {
            return Err(GeneratorError::RenderFailed {
                message: format!("contract `{}` maps to the keyword module `{}`", artifact.name, module),
            });
        }
        modules.insert(module.clone(), artifact);

        for stem in [format!("{}_events", module), format!("{}_artifacts", module), module] {
            if !stems.insert(stem.clone()) {
                return Err(GeneratorError::RenderFailed {
                    message: format!(
                        "contract `{}` would write `{}.rs`, which another generated file already uses",
                        artifact.name, stem
                    ),
                });
            }
        }
    }

    Ok(())
}

fn check_type_name(name: &str, kind: &str, allowed: &[&str]) -> Result<(), GeneratorError> {
    if !is_identifier(name) {
        return Err(GeneratorError::RenderFailed {
            message: format!("{} name `{}` is not a valid Rust identifier", kind, name),
        });
    }
    if RESERVED_TYPE_NAMES.contains(&name) && !allowed.contains(&name) {
        return Err(GeneratorError::RenderFailed {
            message: format!("{} `{}` clashes with the `{}` type imported by the bindings", kind, name, name),
        });
    }
    Ok(())
}

/// Reserved names a contract handle may take; only the structs file imports them.
const HANDLE_ALLOWED: &[&str] = &["Token"];

/// Shared inputs of every builder.
pub struct RenderContext<'a> {
    pub registry: &'a StructRegistry,
    pub config: &'a GeneratorConfig,
}

impl<'a> RenderContext<'a> {
    pub fn new(registry: &'a StructRegistry, config: &'a GeneratorConfig) -> Self {
        Self { registry, config }
    }

    /// Renders a type, checking that every struct it names was extracted.
    pub fn ty(&self, ty: &Type) -> Result<String, GeneratorError> {
        self.check_structs(ty)?;
        rust_types::to_rust_type(ty, self.config.strict_types)
    }

    /// Renders the type an event field has in a decoded log.
    pub fn topic_ty(&self, ty: &Type, indexed: bool) -> Result<String, GeneratorError> {
        self.check_structs(ty)?;
        rust_types::to_topic_type(ty, indexed, self.config.strict_types)
    }

    fn check_structs(&self, ty: &Type) -> Result<(), GeneratorError> {
        match ty {
            Type::Slice(elem) | Type::Array(elem, _) => self.check_structs(elem),
            Type::Tuple(tuple) => {
                if !tuple.name.is_empty() && !self.registry.contains(&type_name(&tuple.name)) {
                    return Err(GeneratorError::RenderFailed {
                        message: format!("struct '{}' was never extracted", type_name(&tuple.name)),
                    });
                }
                for elem in &tuple.elems {
                    self.check_structs(&elem.ty)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Module holding the shared structs, e.g. `contracts_structs`.
    pub fn structs_module(&self) -> String {
        format!("{}_structs", to_snake_case(&type_name(&self.config.name)))
    }

    /// Module for a contract, e.g. `erc20_token`.
    pub fn contract_module(&self, contract: &str) -> String {
        module_name(contract)
    }

    /// `use` path into the runtime crate.
    pub fn runtime(&self, names: &[&str]) -> String {
        format!("{}::{{{}}}", self.config.runtime_crate, names.join(", "))
    }

    /// Standard header of every generated file.
    pub fn header(&self, subject: &str) -> Vec<String> {
        vec![
            subject.to_string(),
            String::new(),
            format!(
                "Generated by abigen for package `{}`. Do not edit by hand.",
                self.config.package
            ),
        ]
    }
}

/// Rust method name for an ABI function or event name.
///
/// Names the handle already uses get a trailing underscore.
pub fn method_ident(raw: &str) -> String {
    const RESERVED: &[&str] = &["new", "contract", "deploy", "address"];
    let ident = rust_ident(&to_identifier(raw));
    if RESERVED.contains(&ident.as_str()) {
        format!("{}_", ident)
    } else {
        ident
    }
}

/// Canonical ABI signature, e.g. `transfer(address,uint256)`.
pub fn signature(name: &str, inputs: &[crate::ir::TupleElem]) -> String {
    let types: Vec<String> = inputs.iter().map(|i| i.ty.to_string()).collect();
    format!("{}({})", name, types.join(","))
}

/// A parameter name that does not clash with `taken`.
pub fn free_name(preferred: &str, taken: &[String]) -> String {
    let mut name = preferred.to_string();
    while taken.iter().any(|t| *t == name) {
        name.push('_');
    }
    name
}
