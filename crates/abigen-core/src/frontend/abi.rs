//! JSON ABI parsing into the type model.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::diagnostic::GeneratorError;
use crate::ir::{Abi, ConstructorIR, EventIR, MethodIR, TupleElem, Type};

/// One entry of a JSON ABI array.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub inputs: Vec<AbiParam>,

    #[serde(default)]
    pub outputs: Vec<AbiParam>,

    #[serde(rename = "stateMutability", default)]
    pub state_mutability: Option<String>,

    /// Pre-0.5 compilers only.
    #[serde(default)]
    pub constant: Option<bool>,

    /// Pre-0.5 compilers only.
    #[serde(default)]
    pub payable: Option<bool>,

    #[serde(default)]
    pub anonymous: bool,
}

/// An input or output of an ABI entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(rename = "internalType", default)]
    pub internal_type: Option<String>,

    #[serde(default)]
    pub indexed: bool,

    #[serde(default)]
    pub components: Vec<AbiParam>,
}

fn default_entry_type() -> String {
    "function".to_string()
}

/// Parses a JSON ABI array.
pub fn parse_abi(json: &str) -> Result<Abi, GeneratorError> {
    parse_abi_at(json, Path::new("<abi>"))
}

/// Parses a JSON ABI array read from `path`; the path only appears in errors.
pub fn parse_abi_at(json: &str, path: &Path) -> Result<Abi, GeneratorError> {
    let entries: Vec<AbiEntry> =
        serde_json::from_str(json).map_err(|e| GeneratorError::AbiParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    abi_from_entries(entries)
}

/// Parses an already decoded ABI array.
pub fn parse_abi_value(value: serde_json::Value, path: &Path) -> Result<Abi, GeneratorError> {
    let entries: Vec<AbiEntry> =
        serde_json::from_value(value).map_err(|e| GeneratorError::AbiParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    abi_from_entries(entries)
}

/// Builds the contract IR, keeping description order.
pub fn abi_from_entries(entries: Vec<AbiEntry>) -> Result<Abi, GeneratorError> {
    let mut abi = Abi::default();
    let mut method_names: HashMap<String, usize> = HashMap::new();
    let mut event_names: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let payable = entry.state_mutability.as_deref() == Some("payable")
            || entry.payable == Some(true);

        match entry.kind.as_str() {
            "constructor" => {
                abi.constructor = Some(ConstructorIR {
                    inputs: parse_params(&entry.inputs)?,
                    payable,
                });
            }
            "function" => {
                let constant = matches!(entry.state_mutability.as_deref(), Some("view" | "pure"))
                    || entry.constant == Some(true);
                let mut method = MethodIR::new(
                    entry.name.clone(),
                    parse_params(&entry.inputs)?,
                    parse_params(&entry.outputs)?,
                    constant,
                );
                method.payable = payable;
                method.binding_name = overload_name(&entry.name, &mut method_names);
                abi.methods.push(method);
            }
            "event" => {
                let mut event = EventIR::new(entry.name.clone(), parse_params(&entry.inputs)?);
                event.anonymous = entry.anonymous;
                event.binding_name = overload_name(&entry.name, &mut event_names);
                abi.events.push(event);
            }
            // fallback, receive and error entries carry nothing to bind
            _ => {}
        }
    }

    Ok(abi)
}

/// `name` for the first declaration, then `name0`, `name1`, ... for overloads.
fn overload_name(name: &str, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(name.to_string()).or_insert(0);
    let binding = if *count == 0 {
        name.to_string()
    } else {
        format!("{}{}", name, *count - 1)
    };
    *count += 1;
    binding
}

fn parse_params(params: &[AbiParam]) -> Result<Vec<TupleElem>, GeneratorError> {
    params
        .iter()
        .map(|param| {
            Ok(TupleElem {
                name: param.name.clone(),
                indexed: param.indexed,
                ty: parse_type(param)?,
            })
        })
        .collect()
}

/// Parses the type of a single parameter, including tuple components.
pub fn parse_type(param: &AbiParam) -> Result<Type, GeneratorError> {
    parse_type_str(&param.ty, param.internal_type.as_deref(), &param.components)
}

fn parse_type_str(
    ty: &str,
    internal_type: Option<&str>,
    components: &[AbiParam],
) -> Result<Type, GeneratorError> {
    let ty = ty.trim();

    // Array suffixes bind from the right: T[3][] is a slice of T[3].
    if let Some(stripped) = ty.strip_suffix(']') {
        let open = stripped.rfind('[').ok_or_else(|| invalid(ty))?;
        let elem = parse_type_str(&stripped[..open], internal_type, components)?;
        let dim = &stripped[open + 1..];
        if dim.is_empty() {
            return Ok(Type::slice(elem));
        }
        let size: usize = dim.parse().map_err(|_| invalid(ty))?;
        return Ok(Type::array(elem, size));
    }

    match ty {
        "address" => return Ok(Type::Address),
        "bool" => return Ok(Type::Bool),
        "string" => return Ok(Type::String),
        "bytes" => return Ok(Type::Bytes),
        "function" => return Ok(Type::Unsupported(ty.to_string())),
        "tuple" => {
            let elems = parse_params(components)?;
            return Ok(Type::tuple(tuple_name(internal_type), elems));
        }
        _ => {}
    }

    if let Some(width) = ty.strip_prefix("uint") {
        return Ok(Type::UInt(parse_width(width, ty)?));
    }
    if let Some(width) = ty.strip_prefix("int") {
        return Ok(Type::Int(parse_width(width, ty)?));
    }
    if let Some(size) = ty.strip_prefix("bytes") {
        let size: usize = size.parse().map_err(|_| invalid(ty))?;
        if !(1..=32).contains(&size) {
            return Err(invalid(ty));
        }
        return Ok(Type::FixedBytes(size));
    }
    if ty.starts_with("fixed") || ty.starts_with("ufixed") {
        return Ok(Type::Unsupported(ty.to_string()));
    }

    Err(invalid(ty))
}

fn parse_width(width: &str, ty: &str) -> Result<usize, GeneratorError> {
    if width.is_empty() {
        return Ok(256);
    }
    let width: usize = width.parse().map_err(|_| invalid(ty))?;
    if width == 0 || width > 256 || width % 8 != 0 {
        return Err(invalid(ty));
    }
    Ok(width)
}

/// Declared struct name from an `internalType` such as `struct Queue.Transaction[]`.
fn tuple_name(internal_type: Option<&str>) -> String {
    internal_type
        .and_then(|it| it.trim().strip_prefix("struct "))
        .map(|it| it.split('[').next().unwrap_or(it))
        .and_then(|it| it.rsplit('.').next())
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn invalid(ty: &str) -> GeneratorError {
    GeneratorError::InvalidAbiType {
        type_desc: ty.to_string(),
    }
}
