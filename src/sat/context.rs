//! Explicit compilation state threaded through the model builder and the CNF compiler

use super::atoms::Atom;
use super::compiler::Clause;
use std::collections::BTreeSet;

/// Owns the declared atom set, the auxiliary atom counter and the clauses
/// accumulated while lowering. One context per encoding run.
#[derive(Debug, Default)]
pub struct CompilationContext {
    atoms: BTreeSet<Atom>,
    aux_atoms: Vec<Atom>,
    clauses: Vec<Clause>,
}

impl CompilationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a domain atom
    pub fn declare(&mut self, atom: Atom) -> Atom {
        self.atoms.insert(atom);
        atom
    }

    /// Allocate a fresh auxiliary atom in the reserved namespace
    pub fn fresh_aux(&mut self) -> Atom {
        let atom = Atom::Aux {
            index: self.aux_atoms.len(),
        };
        self.aux_atoms.push(atom);
        atom
    }

    pub fn push_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Hand over the accumulated clauses, leaving the context's clause list empty
    pub fn take_clauses(&mut self) -> Vec<Clause> {
        std::mem::take(&mut self.clauses)
    }

    /// Declared domain atoms, in their total order
    pub fn atoms(&self) -> &BTreeSet<Atom> {
        &self.atoms
    }

    /// Auxiliary atoms, in allocation order
    pub fn aux_atoms(&self) -> &[Atom] {
        &self.aux_atoms
    }

    pub fn is_known(&self, atom: &Atom) -> bool {
        match atom {
            Atom::Color { .. } => self.atoms.contains(atom),
            Atom::Aux { index } => *index < self.aux_atoms.len(),
        }
    }

    pub fn pending_clause_count(&self) -> usize {
        self.clauses.len()
    }
}
