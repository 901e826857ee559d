//! Embedded ABI and bytecode of one contract.

use super::decl::{ConstItem, FnItem, Item, SourceFile};
use super::RenderContext;
use crate::ir::ContractArtifact;

/// Generates the artifacts file of one contract.
///
/// The ABI is embedded verbatim as a raw string and parsed once on first use.
/// Bytecode and its accessor are only emitted when the artifact has any.
pub fn generate_artifacts(artifact: &ContractArtifact, ctx: &RenderContext) -> SourceFile {
    let module = ctx.contract_module(&artifact.name);
    let upper = module.to_uppercase();
    let abi_const = format!("{}_ABI_JSON", upper);

    let mut file = SourceFile {
        docs: ctx.header(&format!("Embedded artifacts of the `{}` contract.", artifact.name)),
        attributes: Vec::new(),
        imports: vec![
            "std::sync::OnceLock".to_string(),
            ctx.runtime(&["Abi"]),
        ],
        items: Vec::new(),
    };

    file.items.push(Item::Const(ConstItem {
        docs: vec![format!(
            "ABI of `{}`, as read from `{}`.",
            artifact.name,
            artifact.source.display()
        )],
        public: true,
        name: abi_const.clone(),
        ty: "&str".to_string(),
        value: raw_string(&artifact.abi_json),
    }));

    file.items.push(Item::Fn(
        FnItem::new(format!("{}_abi", module))
            .doc(format!("Parsed ABI of `{}`.", artifact.name))
            .returns("&'static Abi")
            .line("static ABI: OnceLock<Abi> = OnceLock::new();")
            .line(format!("ABI.get_or_init(|| Abi::from_embedded({}))", abi_const)),
    ));

    if artifact.has_bytecode() {
        let bin_const = format!("{}_BIN", upper);
        file.items.push(Item::Const(ConstItem {
            docs: vec![format!("Creation bytecode of `{}`, hex encoded.", artifact.name)],
            public: true,
            name: bin_const.clone(),
            ty: "&str".to_string(),
            value: format!("\"{}\"", artifact.bin.trim()),
        }));
        file.items.push(Item::Fn(
            FnItem::new(format!("{}_bin", module))
                .returns("&'static str")
                .line(bin_const),
        ));
    }

    file
}

/// A raw string literal holding `text`, with enough `#`s to never terminate early.
fn raw_string(text: &str) -> String {
    let mut longest = 0;
    let mut run: Option<usize> = None;
    for c in text.chars() {
        run = match (run, c) {
            (_, '"') => Some(0),
            (Some(n), '#') => {
                longest = longest.max(n + 1);
                Some(n + 1)
            }
            _ => None,
        };
    }
    let hashes = "#".repeat(longest + 1);
    format!("r{hashes}\"{text}\"{hashes}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::printer::print;
    use crate::config::GeneratorConfig;
    use crate::ir::Abi;
    use crate::registry::StructRegistry;
    use std::path::PathBuf;

    fn artifact(abi_json: &str, bin: &str) -> ContractArtifact {
        ContractArtifact {
            name: "ERC20Token".to_string(),
            abi: Abi::default(),
            abi_json: abi_json.to_string(),
            bin: bin.to_string(),
            source: PathBuf::from("abi/ERC20Token.abi"),
        }
    }

    #[test]
    fn test_raw_string_hash_count() {
        assert_eq!(raw_string("[]"), "r#\"[]\"#");
        assert_eq!(raw_string(r##"["a"#]"##), "r##\"[\"a\"#]\"##");
        assert_eq!(raw_string(r###"x"##y"###), "r###\"x\"##y\"###");
    }

    #[test]
    fn test_abi_only() {
        let registry = StructRegistry::new();
        let config = GeneratorConfig::default();
        let file = generate_artifacts(&artifact("[]", ""), &RenderContext::new(&registry, &config));

        assert!(file.find_fn("erc20_token_abi").is_some());
        assert!(file.find_fn("erc20_token_bin").is_none());

        let text = print(&file);
        assert!(text.contains("pub const ERC20_TOKEN_ABI_JSON: &str = r#\"[]\"#;"));
        assert!(text.contains("ABI.get_or_init(|| Abi::from_embedded(ERC20_TOKEN_ABI_JSON))"));
    }

    #[test]
    fn test_bytecode_accessor() {
        let registry = StructRegistry::new();
        let config = GeneratorConfig::default();
        let file = generate_artifacts(
            &artifact("[]", "0x6080604052"),
            &RenderContext::new(&registry, &config),
        );

        let bin = file.find_fn("erc20_token_bin").unwrap();
        assert_eq!(bin.body, vec!["ERC20_TOKEN_BIN"]);
        assert!(print(&file).contains("pub const ERC20_TOKEN_BIN: &str = \"0x6080604052\";"));
    }
}
