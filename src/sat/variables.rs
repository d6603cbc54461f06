//! Variable interning: stable integer ids for atoms

use super::atoms::{Atom, Literal};
use super::compiler::Clause;
use crate::error::{SchurError, SchurResult};
use std::collections::{BTreeMap, HashMap};

/// Bijection between atom names and positive DIMACS variable ids.
///
/// Built once by [`VariableManager`] on the forward path, or parsed back from a
/// mapping file on the reverse path. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMapping {
    by_name: HashMap<String, u32>,
    by_id: BTreeMap<u32, String>,
}

impl VariableMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `name <-> id` pair, rejecting anything that would break the bijection
    pub fn insert(&mut self, name: String, id: u32) -> Result<(), String> {
        if id == 0 {
            return Err("variable ids must be positive".to_string());
        }
        if self.by_name.contains_key(&name) {
            return Err(format!("atom '{}' appears more than once", name));
        }
        if let Some(other) = self.by_id.get(&id) {
            return Err(format!("id {} is already assigned to '{}'", id, other));
        }
        self.by_name.insert(name.clone(), id);
        self.by_id.insert(id, name);
        Ok(())
    }

    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn id_of_atom(&self, atom: &Atom) -> Option<u32> {
        self.id_of(&atom.to_string())
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Entries in ascending id order, which for an interned mapping is the
    /// order atoms were first discovered in
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.by_id.iter().map(|(&id, name)| (name.as_str(), id))
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.by_id.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Signed DIMACS literal for `literal`
    pub fn dimacs_literal(&self, literal: &Literal) -> SchurResult<i64> {
        let id = self
            .id_of_atom(&literal.atom)
            .ok_or_else(|| SchurError::UnmappedAtom(literal.atom.to_string()))?;
        let id = i64::from(id);
        Ok(if literal.positive { id } else { -id })
    }

    /// Signed DIMACS literals for every literal of `clause`
    pub fn encode_clause(&self, clause: &Clause) -> SchurResult<Vec<i64>> {
        clause.literals.iter().map(|l| self.dimacs_literal(l)).collect()
    }
}

/// Assigns ids to atoms in first-discovery order, starting from 1
#[derive(Debug)]
pub struct VariableManager {
    mapping: VariableMapping,
    /// Next available variable ID
    next_id: u32,
}

impl VariableManager {
    /// Create a new variable manager
    pub fn new() -> Self {
        Self {
            mapping: VariableMapping::new(),
            next_id: 1, // SAT variables start from 1
        }
    }

    /// Get or create the id of `atom`
    pub fn get_variable(&mut self, atom: &Atom) -> u32 {
        let name = atom.to_string();
        if let Some(id) = self.mapping.id_of(&name) {
            return id;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.mapping.by_name.insert(name.clone(), id);
        self.mapping.by_id.insert(id, name);
        id
    }

    /// Intern every atom referenced by `clauses`, scanning clauses in order
    /// and literals left to right
    pub fn intern_clauses(&mut self, clauses: &[Clause]) {
        for clause in clauses {
            for literal in &clause.literals {
                self.get_variable(&literal.atom);
            }
        }
    }

    /// Get the total number of variables created
    pub fn variable_count(&self) -> usize {
        (self.next_id - 1) as usize
    }

    /// Freeze the manager into its final mapping
    pub fn into_mapping(self) -> VariableMapping {
        self.mapping
    }

    /// Build the mapping for a clause list in one go
    pub fn intern(clauses: &[Clause]) -> VariableMapping {
        let mut manager = Self::new();
        manager.intern_clauses(clauses);
        manager.into_mapping()
    }
}

impl Default for VariableManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(item: usize, label: usize) -> Atom {
        Atom::color(item, label)
    }

    #[test]
    fn test_variable_creation() {
        let mut vm = VariableManager::new();

        let var1 = vm.get_variable(&c(0, 0));
        let var2 = vm.get_variable(&c(1, 1));

        assert_eq!(var1, 1);
        assert_eq!(var2, 2);

        // Test that same variable returns same ID
        assert_eq!(vm.get_variable(&c(0, 0)), var1);
        assert_eq!(vm.variable_count(), 2);
    }

    #[test]
    fn test_first_discovery_order() {
        let clauses = vec![
            Clause::new(vec![c(2, 0).positive(), c(0, 0).negative()]),
            Clause::new(vec![c(0, 0).positive(), c(1, 0).positive()]),
        ];
        let mapping = VariableManager::intern(&clauses);

        let order: Vec<_> = mapping.iter().collect();
        assert_eq!(order, vec![("color_2_0", 1), ("color_0_0", 2), ("color_1_0", 3)]);
        assert_eq!(mapping.encode_clause(&clauses[0]).unwrap(), vec![1, -2]);
    }

    #[test]
    fn test_interning_is_idempotent() {
        let clauses = vec![
            Clause::new(vec![c(0, 1).positive(), c(3, 0).negative()]),
            Clause::unit(Atom::Aux { index: 0 }.positive()),
        ];
        assert_eq!(VariableManager::intern(&clauses), VariableManager::intern(&clauses));
    }

    #[test]
    fn test_bijection_checks() {
        let mut mapping = VariableMapping::new();
        assert!(mapping.insert("a".to_string(), 1).is_ok());
        assert!(mapping.insert("a".to_string(), 2).is_err());
        assert!(mapping.insert("b".to_string(), 1).is_err());
        assert!(mapping.insert("c".to_string(), 0).is_err());
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.name_of(1), Some("a"));
    }

    #[test]
    fn test_unmapped_atom() {
        let mapping = VariableMapping::new();
        assert!(matches!(
            mapping.dimacs_literal(&c(0, 0).positive()),
            Err(SchurError::UnmappedAtom(_))
        ));
    }
}
