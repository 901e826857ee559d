//! Language-agnostic representation of contract interfaces.
//!
//! This IR is produced by the ABI frontend and consumed by struct
//! extraction and code generation. Nothing in here knows about the
//! target language.

mod abi;
mod types;

pub use abi::{Abi, ConstructorIR, ContractArtifact, EventIR, MethodIR};
pub use types::{TupleElem, TupleType, Type};
