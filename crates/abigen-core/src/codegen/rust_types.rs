//! Rust type rendering for ABI types.

use crate::diagnostic::GeneratorError;
use crate::ident::type_name;
use crate::ir::Type;

/// Widths that map onto a native Rust integer.
const NATIVE_WIDTHS: &[usize] = &[8, 16, 32, 64, 128];

/// Rendering of the topic hash used for indexed dynamic event fields.
pub const TOPIC_HASH_TYPE: &str = "Hash";

/// Converts a type to its Rust spelling.
///
/// Named tuples render as their struct name, anonymous ones as a Rust tuple.
/// Types with no rendering fail with `UnsupportedType` when `strict` is set
/// and otherwise render as a placeholder.
pub fn to_rust_type(ty: &Type, strict: bool) -> Result<String, GeneratorError> {
    match ty {
        Type::Address => Ok("Address".to_string()),
        Type::Bool => Ok("bool".to_string()),
        Type::String => Ok("String".to_string()),
        Type::Int(width) if valid_width(*width) => Ok(int_type(*width, true)),
        Type::UInt(width) if valid_width(*width) => Ok(int_type(*width, false)),
        Type::FixedBytes(size) if (1..=32).contains(size) => Ok(format!("[u8; {}]", size)),
        Type::Bytes => Ok("Vec<u8>".to_string()),
        Type::Slice(elem) => Ok(format!("Vec<{}>", to_rust_type(elem, strict)?)),
        Type::Array(elem, size) => Ok(format!("[{}; {}]", to_rust_type(elem, strict)?, size)),
        Type::Tuple(tuple) if !tuple.name.is_empty() => Ok(type_name(&tuple.name)),
        Type::Tuple(tuple) => {
            let elems = tuple
                .elems
                .iter()
                .map(|elem| to_rust_type(&elem.ty, strict))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rust_tuple(&elems))
        }
        other => unsupported(other, strict),
    }
}

/// Type of an event field as seen in the log record.
///
/// Indexed fields of dynamic or composite type only survive as their hash.
pub fn to_topic_type(ty: &Type, indexed: bool, strict: bool) -> Result<String, GeneratorError> {
    if indexed && ty.is_hashed_topic() {
        Ok(TOPIC_HASH_TYPE.to_string())
    } else {
        to_rust_type(ty, strict)
    }
}

/// Renders a list of types as a Rust tuple; a single element keeps its trailing comma.
pub fn rust_tuple(elems: &[String]) -> String {
    match elems.len() {
        1 => format!("({},)", elems[0]),
        _ => format!("({})", elems.join(", ")),
    }
}

/// Placeholder or error for a leaf type with no rendering.
pub fn unsupported(ty: &Type, strict: bool) -> Result<String, GeneratorError> {
    if strict {
        Err(GeneratorError::UnsupportedType {
            type_desc: ty.to_string(),
        })
    } else {
        Ok(format!("() /* unsupported ABI type `{}` */", ty))
    }
}

fn valid_width(width: usize) -> bool {
    width > 0 && width <= 256 && width % 8 == 0
}

fn int_type(width: usize, signed: bool) -> String {
    match (NATIVE_WIDTHS.contains(&width), signed) {
        (true, true) => format!("i{}", width),
        (true, false) => format!("u{}", width),
        (false, true) => "I256".to_string(),
        (false, false) => "U256".to_string(),
    }
}
