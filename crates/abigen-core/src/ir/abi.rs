//! Contract-level IR: constructor, methods and events of one ABI.

use std::path::PathBuf;

use super::types::TupleElem;

/// A parsed contract ABI, entries kept in description order.
#[derive(Debug, Clone, Default)]
pub struct Abi {
    pub constructor: Option<ConstructorIR>,
    pub methods: Vec<MethodIR>,
    pub events: Vec<EventIR>,
}

#[derive(Debug, Clone, Default)]
pub struct ConstructorIR {
    pub inputs: Vec<TupleElem>,
    pub payable: bool,
}

/// A contract function.
#[derive(Debug, Clone)]
pub struct MethodIR {
    /// Name as declared in the ABI; used on the wire.
    pub name: String,
    /// Name used for the generated method. Differs from `name` for overloads.
    pub binding_name: String,
    pub inputs: Vec<TupleElem>,
    pub outputs: Vec<TupleElem>,
    /// `view`/`pure` functions are read with a call instead of a transaction.
    pub constant: bool,
    pub payable: bool,
}

#[derive(Debug, Clone)]
pub struct EventIR {
    pub name: String,
    /// Name used for the generated record and helpers. Differs from `name` for overloads.
    pub binding_name: String,
    pub inputs: Vec<TupleElem>,
    pub anonymous: bool,
}

/// One contract's interface description plus optional bytecode.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub abi: Abi,
    /// The ABI exactly as read, embedded verbatim into the generated artifacts file.
    pub abi_json: String,
    /// Hex-encoded creation bytecode, `0x`-prefixed. Empty when absent.
    pub bin: String,
    pub source: PathBuf,
}

impl MethodIR {
    pub fn new(name: impl Into<String>, inputs: Vec<TupleElem>, outputs: Vec<TupleElem>, constant: bool) -> Self {
        let name = name.into();
        Self {
            binding_name: name.clone(),
            name,
            inputs,
            outputs,
            constant,
            payable: false,
        }
    }
}

impl EventIR {
    pub fn new(name: impl Into<String>, inputs: Vec<TupleElem>) -> Self {
        let name = name.into();
        Self {
            binding_name: name.clone(),
            name,
            inputs,
            anonymous: false,
        }
    }
}

impl ContractArtifact {
    pub fn has_bytecode(&self) -> bool {
        let hex = self.bin.trim().trim_start_matches("0x");
        !hex.is_empty()
    }
}
