//! Constraint generation for the Schur colouring SAT encoding

use super::atoms::Atom;
use super::context::CompilationContext;
use super::formula::Formula;
use crate::config::settings::validate_parameters;
use crate::config::AtMostOneEncoding;
use crate::error::SchurResult;
use crate::schur::{schur_triples, triple_count, SchurTriple};
use itertools::Itertools;

/// Why a constraint exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    AtLeastOne { item: usize },
    AtMostOne { item: usize },
    ForbiddenTriple { triple: SchurTriple, label: usize },
    SymmetryBreaking,
}

/// One top-level conjunct of the constraint tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub formula: Formula,
}

impl Constraint {
    pub fn new(kind: ConstraintKind, formula: Formula) -> Self {
        Self { kind, formula }
    }
}

/// Generates the constraint tree for partitioning 1..=n into k sum-free classes
#[derive(Debug, Clone)]
pub struct ConstraintGenerator {
    items: usize,
    labels: usize,
    at_most_one: AtMostOneEncoding,
    symmetry_breaking: bool,
}

impl ConstraintGenerator {
    /// Create a new constraint generator
    pub fn new(
        items: usize,
        labels: usize,
        at_most_one: AtMostOneEncoding,
        symmetry_breaking: bool,
    ) -> SchurResult<Self> {
        validate_parameters(items, labels)?;

        Ok(Self {
            items,
            labels,
            at_most_one,
            symmetry_breaking,
        })
    }

    /// Generate all constraints, declaring every colour atom in `ctx`.
    ///
    /// The returned list is an implicit conjunction; its order is the order
    /// clauses will later be emitted in.
    pub fn generate_all_constraints(&self, ctx: &mut CompilationContext) -> Vec<Constraint> {
        let mut constraints = Vec::new();

        for item in 0..self.items {
            for label in 0..self.labels {
                ctx.declare(Atom::color(item, label));
            }
        }

        // 1. Exactly one label per item
        for item in 0..self.items {
            constraints.extend(self.generate_cardinality_constraints(item));
        }

        // 2. No monochromatic triple
        for triple in schur_triples(self.items) {
            constraints.extend(self.generate_forbidden_triple_constraints(triple));
        }

        // 3. Symmetry breaking (if enabled)
        if self.symmetry_breaking {
            constraints.extend(self.generate_symmetry_breaking_constraints());
        }

        constraints
    }

    fn label_atoms(&self, item: usize) -> impl Iterator<Item = Atom> + Clone {
        (0..self.labels).map(move |label| Atom::color(item, label))
    }

    fn generate_cardinality_constraints(&self, item: usize) -> [Constraint; 2] {
        let at_least_one = Formula::or_of(self.label_atoms(item));

        // a single label cannot be doubly assigned
        let at_most_one = match self.at_most_one {
            _ if self.labels < 2 => Formula::And(Vec::new()),
            AtMostOneEncoding::Pairwise => Formula::And(
                self.label_atoms(item)
                    .tuple_combinations()
                    .map(|(x, y)| Formula::not_all([x, y]))
                    .collect(),
            ),
            AtMostOneEncoding::NegatedConjunction => Formula::not_all(self.label_atoms(item)),
        };

        [
            Constraint::new(ConstraintKind::AtLeastOne { item }, at_least_one),
            Constraint::new(ConstraintKind::AtMostOne { item }, at_most_one),
        ]
    }

    fn generate_forbidden_triple_constraints(&self, triple: SchurTriple) -> Vec<Constraint> {
        let [a, b, c] = triple.items();
        (0..self.labels)
            .map(|label| {
                Constraint::new(
                    ConstraintKind::ForbiddenTriple { triple, label },
                    Formula::not_all([
                        Atom::color(a, label),
                        Atom::color(b, label),
                        Atom::color(c, label),
                    ]),
                )
            })
            .collect()
    }

    /// Without loss of generality 1 gets label 0 and 2 gets label 1 (they must
    /// differ since 1 + 1 = 2). Then i and i + 1 cannot both carry label 0, and
    /// i and i + 2 cannot both carry label 1.
    fn generate_symmetry_breaking_constraints(&self) -> Vec<Constraint> {
        let mut constraints = Vec::new();
        let n = self.items;
        let second_pin = n >= 2 && self.labels >= 2;

        constraints.push(Self::symmetry(Formula::atom(Atom::color(0, 0))));
        if second_pin {
            constraints.push(Self::symmetry(Formula::atom(Atom::color(1, 1))));
        }

        for i in 0..n.saturating_sub(1) {
            constraints.push(Self::symmetry(Formula::not_all([
                Atom::color(i, 0),
                Atom::color(i + 1, 0),
            ])));
        }

        if second_pin {
            for i in 0..n.saturating_sub(2) {
                constraints.push(Self::symmetry(Formula::not_all([
                    Atom::color(i, 1),
                    Atom::color(i + 2, 1),
                ])));
            }
        }

        constraints
    }

    fn symmetry(formula: Formula) -> Constraint {
        Constraint::new(ConstraintKind::SymmetryBreaking, formula)
    }

    pub fn items(&self) -> usize {
        self.items
    }

    pub fn labels(&self) -> usize {
        self.labels
    }

    /// Number of CNF clauses the core constraints compile to, ignoring
    /// symmetry breaking. Exact because no two core constraints share a clause.
    pub fn expected_core_clause_count(&self) -> usize {
        let (n, k) = (self.items, self.labels);
        let at_most_one = match self.at_most_one {
            AtMostOneEncoding::Pairwise => k * (k - 1) / 2,
            AtMostOneEncoding::NegatedConjunction => usize::from(k >= 2),
        };
        n * (1 + at_most_one) + k * triple_count(n)
    }

    /// Get statistics about a generated constraint list
    pub fn statistics(constraints: &[Constraint]) -> ConstraintStatistics {
        let mut stats = ConstraintStatistics::default();
        for constraint in constraints {
            match constraint.kind {
                ConstraintKind::AtLeastOne { .. } => stats.at_least_one += 1,
                ConstraintKind::AtMostOne { .. } => stats.at_most_one += 1,
                ConstraintKind::ForbiddenTriple { .. } => stats.forbidden_triples += 1,
                ConstraintKind::SymmetryBreaking => stats.symmetry_breaking += 1,
            }
        }
        stats
    }
}

/// Statistics about generated constraints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintStatistics {
    pub at_least_one: usize,
    pub at_most_one: usize,
    pub forbidden_triples: usize,
    pub symmetry_breaking: usize,
}

impl std::fmt::Display for ConstraintStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Constraint Statistics:")?;
        writeln!(f, "  At-least-one: {}", self.at_least_one)?;
        writeln!(f, "  At-most-one: {}", self.at_most_one)?;
        writeln!(f, "  Forbidden triples: {}", self.forbidden_triples)?;
        writeln!(f, "  Symmetry breaking: {}", self.symmetry_breaking)?;
        Ok(())
    }
}
