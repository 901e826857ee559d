//! De-duplicated struct declarations keyed by name.
//!
//! The registry is the only place struct definitions are stored. Entries
//! are added or rejected, never replaced: inserting a definition whose
//! shape differs from the one already registered under the same name is a
//! [`GeneratorError::StructConflict`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostic::GeneratorError;

/// One field of a struct declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    /// Canonical field name (see [`crate::ident::field_names`]).
    pub name: String,

    /// Rendered Rust type of the field.
    #[serde(rename = "type")]
    pub ty: String,
}

/// A canonical struct declaration.
///
/// Equality is structural: same name and the same fields in the same
/// order. `is_event` is bookkeeping only and does not take part.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,

    pub fields: Vec<StructField>,

    /// Set when the struct was first found under an event input.
    #[serde(rename = "isEvent", default)]
    pub is_event: bool,
}

impl PartialEq for StructDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl StructDef {
    pub fn new(name: impl Into<String>, fields: Vec<StructField>, is_event: bool) -> Self {
        Self {
            name: name.into(),
            fields,
            is_event,
        }
    }
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Shape summary used in conflict messages, e.g. `{ timestamp: U256, data: Vec<u8> }`.
impl fmt::Display for StructDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return write!(f, "{{}}");
        }
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{}: {}", field.name, field.ty))
            .collect();
        write!(f, "{{ {} }}", fields.join(", "))
    }
}

/// Name -> definition map, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructRegistry {
    structs: BTreeMap<String, StructDef>,
}

impl StructRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition.
    ///
    /// Returns `Ok(true)` when the name was new, `Ok(false)` when an equal
    /// definition was already present, and a `StructConflict` when the name
    /// is taken by a different shape.
    pub fn insert(&mut self, def: StructDef) -> Result<bool, GeneratorError> {
        match self.structs.get(&def.name) {
            None => {
                self.structs.insert(def.name.clone(), def);
                Ok(true)
            }
            Some(existing) if *existing == def => Ok(false),
            Some(existing) => Err(GeneratorError::StructConflict {
                name: def.name.clone(),
                existing: existing.to_string(),
                incoming: def.to_string(),
            }),
        }
    }

    /// Merges every definition of `other` through [`insert`](Self::insert).
    ///
    /// Returns the number of names that were new to `self`.
    pub fn merge(&mut self, other: StructRegistry) -> Result<usize, GeneratorError> {
        let mut added = 0;
        for def in other.structs.into_values() {
            if self.insert(def)? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn get(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.structs.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructDef> {
        self.structs.values()
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction() -> StructDef {
        StructDef::new(
            "Transaction",
            vec![
                StructField::new("timestamp", "U256"),
                StructField::new("entrypoint", "Address"),
                StructField::new("data", "Vec<u8>"),
            ],
            false,
        )
    }

    #[test]
    fn test_insert_new_and_identical() {
        let mut registry = StructRegistry::new();
        assert!(registry.insert(transaction()).unwrap());
        assert!(!registry.insert(transaction()).unwrap());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_conflict_names_struct() {
        let mut registry = StructRegistry::new();
        registry.insert(transaction()).unwrap();

        let smaller = StructDef::new(
            "Transaction",
            vec![StructField::new("timestamp", "U256")],
            false,
        );
        let err = registry.insert(smaller).unwrap_err();
        match err {
            GeneratorError::StructConflict { name, existing, incoming } => {
                assert_eq!(name, "Transaction");
                assert_eq!(existing, "{ timestamp: U256, entrypoint: Address, data: Vec<u8> }");
                assert_eq!(incoming, "{ timestamp: U256 }");
            }
            other => panic!("expected StructConflict, got {:?}", other),
        }
        assert_eq!(registry.get("Transaction").unwrap().fields.len(), 3);
    }

    #[test]
    fn test_field_order_matters() {
        let mut registry = StructRegistry::new();
        registry.insert(transaction()).unwrap();

        let mut reordered = transaction();
        reordered.fields.swap(0, 1);
        assert!(matches!(
            registry.insert(reordered),
            Err(GeneratorError::StructConflict { .. })
        ));
    }

    #[test]
    fn test_is_event_not_part_of_equality() {
        let mut registry = StructRegistry::new();
        registry.insert(transaction()).unwrap();

        let mut from_event = transaction();
        from_event.is_event = true;
        assert!(!registry.insert(from_event).unwrap());
    }

    #[test]
    fn test_merge_counts_new_names() {
        let mut left = StructRegistry::new();
        left.insert(transaction()).unwrap();

        let mut right = StructRegistry::new();
        right.insert(transaction()).unwrap();
        right
            .insert(StructDef::new("Point", vec![StructField::new("x", "U256")], false))
            .unwrap();

        assert_eq!(left.merge(right).unwrap(), 1);
        assert_eq!(left.len(), 2);
        let names: Vec<&str> = left.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Point", "Transaction"]);
    }
}
