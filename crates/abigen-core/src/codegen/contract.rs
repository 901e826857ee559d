//! Contract handle generation: deploy helper, call accessors and
//! transaction builders.

use super::decl::{FieldItem, FnItem, ImplBlock, Item, Param, SourceFile, StructItem};
use super::{free_name, method_ident, signature, RenderContext};
use crate::diagnostic::GeneratorError;
use crate::ident::{field_names, rust_ident, type_name};
use crate::ir::{ContractArtifact, MethodIR, TupleElem};

/// Generates the bindings file of one contract.
pub fn generate_contract(
    artifact: &ContractArtifact,
    ctx: &RenderContext,
) -> Result<SourceFile, GeneratorError> {
    let handle = type_name(&artifact.name);
    let module = ctx.contract_module(&artifact.name);
    let abi_fn = format!("{}_abi", module);
    let bin_fn = format!("{}_bin", module);

    let mut embedded = vec![abi_fn.clone()];
    if artifact.has_bytecode() {
        embedded.push(bin_fn.clone());
    }

    let mut file = SourceFile {
        docs: ctx.header(&format!("Bindings for the `{}` contract.", artifact.name)),
        attributes: vec![
            "allow(unused_imports)".to_string(),
            "allow(clippy::too_many_arguments)".to_string(),
        ],
        imports: vec![
            ctx.runtime(&[
                "Address",
                "BlockNumber",
                "Client",
                "Contract",
                "Detokenize",
                "Error",
                "Hash",
                "I256",
                "Tokenize",
                "TupleReader",
                "Txn",
                "U256",
            ]),
            format!("super::{}::*", ctx.structs_module()),
            format!("super::{}_artifacts::{{{}}}", module, embedded.join(", ")),
        ],
        items: Vec::new(),
    };

    file.items.push(Item::Struct(StructItem {
        docs: vec![
            format!("Handle to a deployed `{}` contract.", artifact.name),
            String::new(),
            "Bundles the contract address, its ABI and the RPC client.".to_string(),
        ],
        derives: vec!["Debug".to_string(), "Clone".to_string()],
        name: handle.clone(),
        fields: vec![FieldItem {
            docs: Vec::new(),
            public: false,
            name: "contract".to_string(),
            ty: "Contract".to_string(),
        }],
    }));

    let mut block = ImplBlock::inherent(handle.clone());

    block.fns.push(
        FnItem::new("new")
            .doc(format!("Binds to a `{}` contract at `address`.", artifact.name))
            .param("address", "Address")
            .param("client", "Client")
            .returns("Self")
            .line("Self {")
            .line(format!("    contract: Contract::new(address, {}(), client),", abi_fn))
            .line("}"),
    );

    block.fns.push(
        FnItem::new("contract")
            .doc("Returns the underlying contract object.")
            .receiver("&self")
            .returns("&Contract")
            .line("&self.contract"),
    );

    block.fns.push(
        FnItem::new("address")
            .receiver("&self")
            .returns("Address")
            .line("self.contract.address()"),
    );

    if artifact.has_bytecode() {
        let inputs = artifact
            .abi
            .constructor
            .as_ref()
            .map(|c| c.inputs.as_slice())
            .unwrap_or_default();
        block.fns.push(deploy_fn(&artifact.name, inputs, &abi_fn, &bin_fn, ctx)?);
    }

    // calls
    for method in artifact.abi.methods.iter().filter(|m| m.constant) {
        block.fns.push(call_fn(method, ctx)?);
    }

    // txns
    for method in artifact.abi.methods.iter().filter(|m| !m.constant) {
        block.fns.push(txn_fn(method, ctx)?);
    }

    file.items.push(Item::Impl(block));

    Ok(file)
}

/// Typed Rust parameters for ABI inputs, avoiding the names in `reserved`.
pub(super) fn input_params(
    inputs: &[TupleElem],
    reserved: &[&str],
    ctx: &RenderContext,
) -> Result<Vec<Param>, GeneratorError> {
    let mut taken: Vec<String> = reserved.iter().map(|r| r.to_string()).collect();
    let mut params = Vec::with_capacity(inputs.len());
    for (input, name) in inputs.iter().zip(field_names(inputs)) {
        let ident = free_name(&rust_ident(&name), &taken);
        taken.push(ident.clone());
        params.push(Param {
            name: ident,
            ty: ctx.ty(&input.ty)?,
        });
    }
    Ok(params)
}

/// `vec![a.into_token(), ..]` for the given parameters.
pub(super) fn token_vec(params: &[Param]) -> String {
    if params.is_empty() {
        return "Vec::new()".to_string();
    }
    let tokens: Vec<String> = params
        .iter()
        .map(|p| format!("{}.into_token()", p.name))
        .collect();
    format!("vec![{}]", tokens.join(", "))
}

fn deploy_fn(
    contract: &str,
    inputs: &[TupleElem],
    abi_fn: &str,
    bin_fn: &str,
    ctx: &RenderContext,
) -> Result<FnItem, GeneratorError> {
    let params = input_params(inputs, &["client", "from"], ctx)?;

    let mut f = FnItem::new("deploy")
        .doc(format!("Builds a transaction deploying a new `{}` contract.", contract))
        .param("client", "&Client")
        .param("from", "Address");
    f.params.extend(params.iter().cloned());

    Ok(f.returns("Txn").line(format!(
        "Contract::deploy(client, from, {}(), {}(), {})",
        abi_fn,
        bin_fn,
        token_vec(&params)
    )))
}

fn call_fn(method: &MethodIR, ctx: &RenderContext) -> Result<FnItem, GeneratorError> {
    let sig = signature(&method.name, &method.inputs);
    let params = input_params(&method.inputs, &[], ctx)?;
    let taken: Vec<String> = params.iter().map(|p| p.name.clone()).collect();
    let block_param = free_name("block", &taken);

    let outputs = method
        .outputs
        .iter()
        .map(|o| ctx.ty(&o.ty))
        .collect::<Result<Vec<_>, _>>()?;
    let ret = match outputs.len() {
        0 => "()".to_string(),
        1 => outputs[0].clone(),
        _ => format!("({})", outputs.join(", ")),
    };

    let mut f = FnItem::new(method_ident(&method.binding_name))
        .doc(format!("Calls `{}` at `{}`.", sig, block_param))
        .receiver("&self");
    f.params.extend(params.iter().cloned());
    f = f.param(block_param.clone(), "BlockNumber");
    f = f.returns(format!("Result<{}, Error>", ret));

    let call = format!(
        "self.contract.call(\"{}\", {}, {})?",
        sig,
        block_param,
        token_vec(&params)
    );

    f = match outputs.len() {
        0 => f.line(format!("{};", call)).line("Ok(())"),
        1 => f
            .line(format!("let output = {};", call))
            .line("let mut outputs = TupleReader::new(output, 1)?;")
            .line("outputs.read()"),
        n => {
            let reads = vec!["outputs.read()?"; n].join(", ");
            f.line(format!("let output = {};", call))
                .line(format!("let mut outputs = TupleReader::new(output, {})?;", n))
                .line(format!("Ok(({}))", reads))
        }
    };

    Ok(f)
}

fn txn_fn(method: &MethodIR, ctx: &RenderContext) -> Result<FnItem, GeneratorError> {
    let sig = signature(&method.name, &method.inputs);
    let params = input_params(&method.inputs, &[], ctx)?;

    let mut f = FnItem::new(method_ident(&method.binding_name))
        .doc(format!("Builds a `{}` transaction.", sig))
        .receiver("&self");
    if method.payable {
        f = f.doc("").doc("The function is payable; attach a value to the returned `Txn`.");
    }
    f.params.extend(params.iter().cloned());

    Ok(f.returns("Txn").line(format!(
        "self.contract.txn(\"{}\", {})",
        sig,
        token_vec(&params)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::printer::print;
    use crate::config::GeneratorConfig;
    use crate::extract::Extractor;
    use crate::frontend::parse_abi;
    use crate::registry::StructRegistry;
    use std::path::PathBuf;

    const TOKEN_ABI: &str = r#"[
      { "type": "constructor", "inputs": [{ "name": "_owner", "type": "address" }] },
      { "type": "function", "name": "balanceOf", "stateMutability": "view",
        "inputs": [{ "name": "owner", "type": "address" }],
        "outputs": [{ "name": "", "type": "uint256" }] },
      { "type": "function", "name": "reserves", "stateMutability": "view",
        "inputs": [{ "name": "block", "type": "uint64" }],
        "outputs": [{ "name": "a", "type": "uint112" }, { "name": "b", "type": "uint112" }] },
      { "type": "function", "name": "transfer", "stateMutability": "nonpayable",
        "inputs": [{ "name": "to", "type": "address" }, { "name": "amount", "type": "uint256" }],
        "outputs": [{ "name": "", "type": "bool" }] },
      { "type": "function", "name": "submit", "stateMutability": "payable",
        "inputs": [{ "name": "tx", "type": "tuple", "internalType": "struct Token.Transaction",
                     "components": [{ "name": "timestamp", "type": "uint256" }, { "name": "data", "type": "bytes" }] }],
        "outputs": [] }
    ]"#;

    fn artifact(bin: &str) -> ContractArtifact {
        ContractArtifact {
            name: "Token".to_string(),
            abi: parse_abi(TOKEN_ABI).unwrap(),
            abi_json: TOKEN_ABI.to_string(),
            bin: bin.to_string(),
            source: PathBuf::from("Token.abi"),
        }
    }

    fn generate(bin: &str) -> SourceFile {
        let artifact = artifact(bin);
        let mut registry = StructRegistry::new();
        Extractor::new(&mut registry, true).extract_abi(&artifact.abi).unwrap();
        let config = GeneratorConfig::default();
        generate_contract(&artifact, &RenderContext::new(&registry, &config)).unwrap()
    }

    #[test]
    fn test_call_accessor() {
        let file = generate("");
        let f = file.find_fn("balance_of").unwrap();
        assert_eq!(f.param_names(), vec!["owner", "block"]);
        assert_eq!(f.ret.as_deref(), Some("Result<U256, Error>"));
        assert!(f.body[0].contains("self.contract.call(\"balanceOf(address)\", block, vec![owner.into_token()])?"));
    }

    #[test]
    fn test_block_param_renamed_on_clash() {
        let file = generate("");
        let f = file.find_fn("reserves").unwrap();
        assert_eq!(f.param_names(), vec!["block", "block_"]);
        assert_eq!(f.ret.as_deref(), Some("Result<(U256, U256), Error>"));
        assert_eq!(f.body.last().unwrap(), "Ok((outputs.read()?, outputs.read()?))");
    }

    #[test]
    fn test_transaction_builder() {
        let file = generate("");
        let f = file.find_fn("transfer").unwrap();
        assert_eq!(f.ret.as_deref(), Some("Txn"));
        assert_eq!(
            f.body,
            vec!["self.contract.txn(\"transfer(address,uint256)\", vec![to.into_token(), amount.into_token()])"]
        );

        let submit = file.find_fn("submit").unwrap();
        assert_eq!(submit.params[0].ty, "Transaction");
        assert!(submit.body[0].contains("submit((uint256,bytes))"));
    }

    #[test]
    fn test_deploy_only_with_bytecode() {
        assert!(generate("").find_fn("deploy").is_none());

        let file = generate("0x6080");
        let deploy = file.find_fn("deploy").unwrap();
        assert_eq!(deploy.param_names(), vec!["client", "from", "owner"]);
        assert!(deploy.body[0].contains("token_abi(), token_bin()"));

        let text = print(&file);
        assert!(text.contains("use super::token_artifacts::{token_abi, token_bin};"));
        assert!(text.contains("pub struct Token {\n    contract: Contract,\n}"));
    }
}
