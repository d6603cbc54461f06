//! Unlowered boolean formulas over atoms

use super::atoms::{Atom, Literal};
use std::collections::BTreeSet;
use std::fmt;

/// A node in a constraint tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    Lit(Literal),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Not(Box<Formula>),
}

impl Formula {
    pub fn atom(atom: Atom) -> Self {
        Formula::Lit(atom.positive())
    }

    pub fn and_of<I: IntoIterator<Item = Atom>>(atoms: I) -> Self {
        Formula::And(atoms.into_iter().map(Formula::atom).collect())
    }

    pub fn or_of<I: IntoIterator<Item = Atom>>(atoms: I) -> Self {
        Formula::Or(atoms.into_iter().map(Formula::atom).collect())
    }

    pub fn not(formula: Formula) -> Self {
        Formula::Not(Box::new(formula))
    }

    /// "Not all of these atoms are true"
    pub fn not_all<I: IntoIterator<Item = Atom>>(atoms: I) -> Self {
        Formula::not(Formula::and_of(atoms))
    }

    /// Whether this formula is a literal or a disjunction of literals
    pub fn is_clause(&self) -> bool {
        match self {
            Formula::Lit(_) => true,
            Formula::Or(children) => children.iter().all(|c| matches!(c, Formula::Lit(_))),
            _ => false,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Formula::Lit(_) => 0,
            Formula::And(children) | Formula::Or(children) => {
                1 + children.iter().map(Formula::depth).max().unwrap_or(0)
            }
            Formula::Not(inner) => 1 + inner.depth(),
        }
    }

    /// Add every atom of this formula to `atoms`
    pub fn collect_atoms(&self, atoms: &mut BTreeSet<Atom>) {
        match self {
            Formula::Lit(literal) => {
                atoms.insert(literal.atom);
            }
            Formula::And(children) | Formula::Or(children) => {
                for child in children {
                    child.collect_atoms(atoms);
                }
            }
            Formula::Not(inner) => inner.collect_atoms(atoms),
        }
    }

    pub fn atoms(&self) -> BTreeSet<Atom> {
        let mut atoms = BTreeSet::new();
        self.collect_atoms(&mut atoms);
        atoms
    }
}

/// SMT-LIB s-expression rendering
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Lit(literal) if literal.positive => write!(f, "{}", literal.atom),
            Formula::Lit(literal) => write!(f, "(not {})", literal.atom),
            Formula::And(children) => write_nary(f, "and", "true", children),
            Formula::Or(children) => write_nary(f, "or", "false", children),
            Formula::Not(inner) => write!(f, "(not {})", inner),
        }
    }
}

fn write_nary(f: &mut fmt::Formatter<'_>, op: &str, unit: &str, children: &[Formula]) -> fmt::Result {
    match children {
        [] => write!(f, "{}", unit),
        [only] => write!(f, "{}", only),
        _ => {
            write!(f, "({}", op)?;
            for child in children {
                write!(f, " {}", child)?;
            }
            write!(f, ")")
        }
    }
}
