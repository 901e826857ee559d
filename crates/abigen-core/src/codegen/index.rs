//! The `mod.rs` tying the generated files together.

use super::decl::{Item, ModItem, SourceFile};
use super::RenderContext;
use crate::ident::type_name;
use crate::ir::ContractArtifact;

/// Generates `mod.rs`: module declarations first, then re-exports.
pub fn generate_index(artifacts: &[ContractArtifact], ctx: &RenderContext) -> SourceFile {
    let mut file = SourceFile {
        docs: ctx.header(&format!("Contract bindings of `{}`.", ctx.config.package)),
        ..SourceFile::default()
    };

    let structs = ctx.structs_module();
    let mut modules = vec![structs.clone()];
    let mut exports = vec![format!("{}::*", structs)];

    for artifact in artifacts {
        let module = ctx.contract_module(&artifact.name);
        let mut embedded = vec![format!("{}_abi", module)];
        if artifact.has_bytecode() {
            embedded.push(format!("{}_bin", module));
        }

        exports.push(format!("{}::{}", module, type_name(&artifact.name)));
        exports.push(format!("{}_events::*", module));
        exports.push(format!("{}_artifacts::{{{}}}", module, embedded.join(", ")));

        modules.push(format!("{}_artifacts", module));
        modules.push(format!("{}_events", module));
        modules.push(module);
    }

    modules.sort();
    file.items
        .extend(modules.into_iter().map(|name| Item::Mod(ModItem { name })));
    file.items.extend(exports.into_iter().map(Item::Use));

    file
}
