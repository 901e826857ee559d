//! The ABI type algebra.

use std::fmt;

/// A type in the ABI type algebra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Address,
    Bool,
    String,
    Int(usize),
    UInt(usize),
    FixedBytes(usize),
    Bytes,
    Slice(Box<Type>),
    Array(Box<Type>, usize),
    Tuple(TupleType),
    /// An ABI type the generator has no rendering for (`function`, `fixed128x18`, ...).
    Unsupported(String),
}

/// A composite record of ordered elements.
///
/// An empty `name` marks an anonymous tuple, such as the unnamed return
/// value of a function. Anonymous tuples never become struct declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleType {
    pub name: String,
    pub elems: Vec<TupleElem>,
}

/// One element of a tuple, or one input/output of a function or event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleElem {
    pub name: String,
    /// Only meaningful for event inputs (topic vs data encoding).
    pub indexed: bool,
    pub ty: Type,
}

impl Type {
    pub fn tuple(name: impl Into<String>, elems: Vec<TupleElem>) -> Self {
        Type::Tuple(TupleType {
            name: name.into(),
            elems,
        })
    }

    pub fn slice(elem: Type) -> Self {
        Type::Slice(Box::new(elem))
    }

    pub fn array(elem: Type, size: usize) -> Self {
        Type::Array(Box::new(elem), size)
    }

    /// Whether this type contains a tuple anywhere, looking through arrays and slices.
    pub fn has_struct(&self) -> bool {
        match self {
            Type::Tuple(_) => true,
            Type::Slice(elem) | Type::Array(elem, _) => elem.has_struct(),
            _ => false,
        }
    }

    /// Whether a value of this type is hashed when used as an indexed event topic.
    pub fn is_hashed_topic(&self) -> bool {
        matches!(
            self,
            Type::String | Type::Bytes | Type::Slice(_) | Type::Array(..) | Type::Tuple(_)
        )
    }
}

impl TupleElem {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            indexed: false,
            ty,
        }
    }

    pub fn indexed(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            indexed: true,
            ty,
        }
    }
}

/// Canonical ABI spelling, e.g. `uint256[]` or `(address,bytes)`.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Address => write!(f, "address"),
            Type::Bool => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Int(width) => write!(f, "int{}", width),
            Type::UInt(width) => write!(f, "uint{}", width),
            Type::FixedBytes(size) => write!(f, "bytes{}", size),
            Type::Bytes => write!(f, "bytes"),
            Type::Slice(elem) => write!(f, "{}[]", elem),
            Type::Array(elem, size) => write!(f, "{}[{}]", elem, size),
            Type::Tuple(tuple) => {
                write!(f, "(")?;
                for (i, elem) in tuple.elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", elem.ty)?;
                }
                write!(f, ")")
            }
            Type::Unsupported(raw) => write!(f, "{}", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_struct_looks_through_arrays() {
        let inner = Type::tuple("Point", vec![TupleElem::new("x", Type::UInt(256))]);
        assert!(inner.has_struct());
        assert!(Type::slice(Type::array(inner, 2)).has_struct());
        assert!(!Type::slice(Type::Address).has_struct());
        assert!(!Type::Bytes.has_struct());
    }

    #[test]
    fn test_display_canonical() {
        let ty = Type::slice(Type::array(Type::UInt(256), 3));
        assert_eq!(ty.to_string(), "uint256[3][]");

        let tuple = Type::tuple(
            "",
            vec![
                TupleElem::new("a", Type::Address),
                TupleElem::new("b", Type::Bytes),
            ],
        );
        assert_eq!(tuple.to_string(), "(address,bytes)");
    }

    #[test]
    fn test_hashed_topics() {
        assert!(Type::String.is_hashed_topic());
        assert!(Type::Bytes.is_hashed_topic());
        assert!(!Type::Address.is_hashed_topic());
        assert!(!Type::FixedBytes(32).is_hashed_topic());
    }
}
