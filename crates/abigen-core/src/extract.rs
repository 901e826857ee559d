//! Struct extraction.
//!
//! Walks the type trees of an ABI depth-first and registers every named
//! tuple as a [`StructDef`]. Inner tuples are registered before the tuple
//! that references them. Subtrees without tuples never touch the registry.

use crate::codegen::rust_types::{rust_tuple, to_rust_type};
use crate::diagnostic::GeneratorError;
use crate::ident::{field_names, type_name};
use crate::ir::{Abi, TupleElem, TupleType, Type};
use crate::registry::{StructDef, StructField, StructRegistry};

/// Extracts the structs of a single type tree into `registry` and returns
/// the rendered type name of the tree.
///
/// Unsupported leaf types are an error; use [`Extractor`] to pick the
/// permissive behavior.
pub fn extract(tree: &Type, registry: &mut StructRegistry) -> Result<String, GeneratorError> {
    Extractor::new(registry, true).extract(tree)
}

/// Depth-first struct extraction into a borrowed registry.
pub struct Extractor<'a> {
    registry: &'a mut StructRegistry,
    strict: bool,
    added: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(registry: &'a mut StructRegistry, strict: bool) -> Self {
        Self {
            registry,
            strict,
            added: 0,
        }
    }

    /// Number of structs this extractor added to the registry so far.
    pub fn added(&self) -> usize {
        self.added
    }

    /// Extracts a type tree and returns its rendered type name.
    pub fn extract(&mut self, ty: &Type) -> Result<String, GeneratorError> {
        self.walk(ty, false)
    }

    /// Extracts every constructor input, method input and output, and event
    /// input of an ABI, in description order.
    ///
    /// Returns the number of struct names that were new to the registry.
    pub fn extract_abi(&mut self, abi: &Abi) -> Result<usize, GeneratorError> {
        let before = self.added;

        if let Some(constructor) = &abi.constructor {
            self.extract_params(&constructor.inputs, false)?;
        }
        for method in &abi.methods {
            self.extract_params(&method.inputs, false)?;
            self.extract_params(&method.outputs, false)?;
        }
        for event in &abi.events {
            self.extract_params(&event.inputs, true)?;
        }

        Ok(self.added - before)
    }

    /// Extracts the parameters that contain at least one tuple.
    pub fn extract_params(&mut self, params: &[TupleElem], in_event: bool) -> Result<(), GeneratorError> {
        for param in params.iter().filter(|p| p.ty.has_struct()) {
            self.walk(&param.ty, in_event)?;
        }
        Ok(())
    }

    fn walk(&mut self, ty: &Type, in_event: bool) -> Result<String, GeneratorError> {
        match ty {
            Type::Slice(elem) => Ok(format!("Vec<{}>", self.walk(elem, in_event)?)),
            Type::Array(elem, size) => Ok(format!("[{}; {}]", self.walk(elem, in_event)?, size)),
            Type::Tuple(tuple) => self.walk_tuple(tuple, in_event),
            leaf => to_rust_type(leaf, self.strict),
        }
    }

    fn walk_tuple(&mut self, tuple: &TupleType, in_event: bool) -> Result<String, GeneratorError> {
        let names = field_names(&tuple.elems);
        let mut fields = Vec::with_capacity(tuple.elems.len());
        for (elem, name) in tuple.elems.iter().zip(names) {
            let ty = self.walk(&elem.ty, in_event)?;
            fields.push(StructField::new(name, ty));
        }

        // Anonymous tuples are decomposed positionally downstream.
        if tuple.name.is_empty() {
            let types: Vec<String> = fields.into_iter().map(|f| f.ty).collect();
            return Ok(rust_tuple(&types));
        }

        let name = type_name(&tuple.name);
        if self.registry.insert(StructDef::new(name.clone(), fields, in_event))? {
            self.added += 1;
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EventIR, MethodIR};

    fn transaction() -> Type {
        Type::tuple(
            "Transaction",
            vec![
                TupleElem::new("timestamp", Type::UInt(256)),
                TupleElem::new("entrypoint", Type::Address),
                TupleElem::new("data", Type::Bytes),
            ],
        )
    }

    fn abi_with(method_inputs: Vec<TupleElem>) -> Abi {
        Abi {
            constructor: None,
            methods: vec![MethodIR::new("T", method_inputs, vec![], false)],
            events: vec![],
        }
    }

    #[test]
    fn test_single_struct() {
        let mut registry = StructRegistry::new();
        let abi = abi_with(vec![
            TupleElem::new("a", transaction()),
            TupleElem::new("b", Type::Bytes),
        ]);

        let added = Extractor::new(&mut registry, true).extract_abi(&abi).unwrap();
        assert_eq!(added, 1);
        assert_eq!(registry.len(), 1);

        let def = registry.get("Transaction").unwrap();
        let fields: Vec<(&str, &str)> = def
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.ty.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![("timestamp", "U256"), ("entrypoint", "Address"), ("data", "Vec<u8>")]
        );
    }

    #[test]
    fn test_idempotent() {
        let mut registry = StructRegistry::new();
        let abi = abi_with(vec![TupleElem::new("a", transaction())]);

        Extractor::new(&mut registry, true).extract_abi(&abi).unwrap();
        let before = registry.len();
        let added = Extractor::new(&mut registry, true).extract_abi(&abi).unwrap();
        assert_eq!(added, 0);
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_nested_registered_inner_first() {
        let point = Type::tuple(
            "Point",
            vec![
                TupleElem::new("x", Type::Int(256)),
                TupleElem::new("y", Type::Int(256)),
            ],
        );
        let path = Type::tuple(
            "Path",
            vec![
                TupleElem::new("points", Type::slice(point.clone())),
                TupleElem::new("corners", Type::array(point, 4)),
            ],
        );

        let mut registry = StructRegistry::new();
        let rendered = extract(&Type::slice(path), &mut registry).unwrap();
        assert_eq!(rendered, "Vec<Path>");
        assert_eq!(registry.len(), 2);

        let path_def = registry.get("Path").unwrap();
        assert_eq!(path_def.fields[0].ty, "Vec<Point>");
        assert_eq!(path_def.fields[1].ty, "[Point; 4]");
    }

    #[test]
    fn test_anonymous_tuple_not_registered() {
        let anonymous = Type::tuple(
            "",
            vec![
                TupleElem::new("", Type::UInt(256)),
                TupleElem::new("", transaction()),
            ],
        );
        let mut registry = StructRegistry::new();
        let rendered = extract(&anonymous, &mut registry).unwrap();
        assert_eq!(rendered, "(U256, Transaction)");
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("Transaction"));
    }

    #[test]
    fn test_unnamed_and_duplicate_fields() {
        let tuple = Type::tuple(
            "Pair",
            vec![
                TupleElem::new("", Type::Address),
                TupleElem::new("", Type::Address),
                TupleElem::new("_", Type::Bool),
            ],
        );
        let mut registry = StructRegistry::new();
        extract(&tuple, &mut registry).unwrap();

        let names: Vec<&str> = registry
            .get("Pair")
            .unwrap()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["arg0", "arg1", "arg2"]);
    }

    #[test]
    fn test_conflict_within_one_run() {
        let other = Type::tuple(
            "Transaction",
            vec![
                TupleElem::new("entrypoint", Type::Address),
                TupleElem::new("timestamp", Type::UInt(256)),
                TupleElem::new("data", Type::Bytes),
            ],
        );
        let abi = abi_with(vec![
            TupleElem::new("a", transaction()),
            TupleElem::new("b", other),
        ]);

        let mut registry = StructRegistry::new();
        let err = Extractor::new(&mut registry, true).extract_abi(&abi).unwrap_err();
        assert!(matches!(err, GeneratorError::StructConflict { ref name, .. } if name == "Transaction"));
    }

    #[test]
    fn test_event_structs_flagged() {
        let abi = Abi {
            constructor: None,
            methods: vec![],
            events: vec![EventIR::new(
                "Queued",
                vec![TupleElem::new("tx", transaction())],
            )],
        };
        let mut registry = StructRegistry::new();
        Extractor::new(&mut registry, true).extract_abi(&abi).unwrap();
        assert!(registry.get("Transaction").unwrap().is_event);
    }

    #[test]
    fn test_outputs_are_extracted() {
        let abi = Abi {
            constructor: None,
            methods: vec![MethodIR::new(
                "latest",
                vec![],
                vec![TupleElem::new("", transaction())],
                true,
            )],
            events: vec![],
        };
        let mut registry = StructRegistry::new();
        assert_eq!(Extractor::new(&mut registry, true).extract_abi(&abi).unwrap(), 1);
    }

    #[test]
    fn test_monotonic_growth() {
        let mut registry = StructRegistry::new();
        Extractor::new(&mut registry, true)
            .extract_abi(&abi_with(vec![TupleElem::new("a", transaction())]))
            .unwrap();

        let second = abi_with(vec![
            TupleElem::new("a", transaction()),
            TupleElem::new("p", Type::tuple("Point", vec![TupleElem::new("x", Type::UInt(8))])),
            TupleElem::new("q", Type::tuple("Quote", vec![TupleElem::new("y", Type::UInt(8))])),
        ]);
        let added = Extractor::new(&mut registry, true).extract_abi(&second).unwrap();
        assert_eq!(added, 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_permissive_placeholder() {
        let tuple = Type::tuple(
            "Callback",
            vec![TupleElem::new("target", Type::Unsupported("function".into()))],
        );
        let mut registry = StructRegistry::new();
        assert!(extract(&tuple, &mut registry).is_err());
        assert!(registry.is_empty());

        Extractor::new(&mut registry, false).extract(&tuple).unwrap();
        assert!(registry.get("Callback").unwrap().fields[0].ty.starts_with("()"));
    }
}
