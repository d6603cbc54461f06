//! Lowering of constraint trees into flat CNF clauses
//!
//! Top-level conjunctions are split, disjunctions of literals become clauses
//! directly and negations are pushed inward through De Morgan. Any compound
//! sub-formula that still sits below a disjunction is replaced by a fresh
//! auxiliary atom `t` together with the defining clauses of `t <=> sub-formula`
//! (Tseitin). For the shallow constraints of the Schur model no auxiliary
//! atoms are ever needed.

use super::atoms::Literal;
use super::constraints::Constraint;
use super::context::CompilationContext;
use super::formula::Formula;
use itertools::Itertools;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub literals: Vec<Literal>,
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: Literal) -> Self {
        Self {
            literals: vec![literal],
        }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether the clause contains an atom in both polarities
    pub fn is_tautology(&self) -> bool {
        self.literals
            .iter()
            .tuple_combinations()
            .any(|(a, b)| a.is_complementary(b))
    }

    /// Order-insensitive identity of the clause as a literal set
    fn set_key(&self) -> Vec<Literal> {
        self.literals.iter().copied().sorted().dedup().collect()
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.literals.iter().join(" ∨ "))
    }
}

/// Result of compiling a constraint list
#[derive(Debug, Clone)]
pub struct CompiledCnf {
    pub clauses: Vec<Clause>,
    pub statistics: CompilationStatistics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationStatistics {
    pub raw_clauses: usize,
    pub auxiliary_atoms: usize,
    pub duplicate_literals_removed: usize,
    pub tautologies_removed: usize,
    pub duplicate_clauses_removed: usize,
    /// Constraints that were already a single disjunction of literals
    pub direct_clauses: usize,
    /// Deepest connective nesting among the lowered constraints
    pub max_depth: usize,
}

/// Tseitin-style CNF compiler
#[derive(Debug, Default)]
pub struct CnfCompiler {
    /// Auxiliary literal already standing for a compound sub-formula
    definitions: HashMap<Formula, Literal>,
}

impl CnfCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower every constraint into `ctx`, then simplify the accumulated clauses.
    /// Clause order follows constraint order.
    pub fn compile(&mut self, ctx: &mut CompilationContext, constraints: &[Constraint]) -> CompiledCnf {
        let aux_before = ctx.aux_atoms().len();

        for constraint in constraints {
            self.lower(ctx, &constraint.formula, true);
        }

        let raw_clauses = ctx.pending_clause_count();
        let (clauses, mut statistics) = simplify(ctx.take_clauses());
        statistics.raw_clauses = raw_clauses;
        statistics.auxiliary_atoms = ctx.aux_atoms().len() - aux_before;
        statistics.direct_clauses = constraints.iter().filter(|c| c.formula.is_clause()).count();
        statistics.max_depth = constraints.iter().map(|c| c.formula.depth()).max().unwrap_or(0);

        debug!(
            "Lowered {} constraints (depth <= {}, {} already clauses) into {} clauses \
             ({} duplicates, {} tautologies removed, {} auxiliary atoms)",
            constraints.len(),
            statistics.max_depth,
            statistics.direct_clauses,
            clauses.len(),
            statistics.duplicate_clauses_removed,
            statistics.tautologies_removed,
            statistics.auxiliary_atoms
        );

        CompiledCnf { clauses, statistics }
    }

    /// Assert `formula` (or its negation when `positive` is false) as clauses
    fn lower(&mut self, ctx: &mut CompilationContext, formula: &Formula, positive: bool) {
        match formula {
            Formula::Lit(literal) => {
                debug_assert!(ctx.is_known(&literal.atom), "undeclared atom {}", literal.atom);
                ctx.push_clause(Clause::unit(Self::polarised(*literal, positive)));
            }
            Formula::Not(inner) => self.lower(ctx, inner, !positive),
            // a ∧ b, or ¬(a ∨ b) = ¬a ∧ ¬b
            Formula::And(children) if positive => {
                for child in children {
                    self.lower(ctx, child, true);
                }
            }
            Formula::Or(children) if !positive => {
                for child in children {
                    self.lower(ctx, child, false);
                }
            }
            // a ∨ b, or ¬(a ∧ b) = ¬a ∨ ¬b
            Formula::Or(children) | Formula::And(children) => {
                let literals = children
                    .iter()
                    .map(|child| self.literal(ctx, child, positive))
                    .collect();
                ctx.push_clause(Clause::new(literals));
            }
        }
    }

    /// A single literal equivalent to `formula` (negated when `positive` is false)
    fn literal(&mut self, ctx: &mut CompilationContext, formula: &Formula, positive: bool) -> Literal {
        match formula {
            Formula::Lit(literal) => {
                debug_assert!(ctx.is_known(&literal.atom), "undeclared atom {}", literal.atom);
                Self::polarised(*literal, positive)
            }
            Formula::Not(inner) => self.literal(ctx, inner, !positive),
            Formula::And(_) | Formula::Or(_) => Self::polarised(self.define(ctx, formula), positive),
        }
    }

    /// Introduce (or reuse) an auxiliary atom `t` with `t <=> formula`
    fn define(&mut self, ctx: &mut CompilationContext, formula: &Formula) -> Literal {
        if let Some(&existing) = self.definitions.get(formula) {
            return existing;
        }

        let (children, is_and) = match formula {
            Formula::And(children) => (children, true),
            Formula::Or(children) => (children, false),
            Formula::Lit(_) | Formula::Not(_) => {
                debug_assert!(false, "only conjunctions and disjunctions need definitions");
                return self.literal(ctx, formula, true);
            }
        };

        let inputs: Vec<Literal> = children
            .iter()
            .map(|child| self.literal(ctx, child, true))
            .collect();
        let t = ctx.fresh_aux().positive();

        if is_and {
            // t → each input; all inputs → t
            for &input in &inputs {
                ctx.push_clause(Clause::new(vec![t.negate(), input]));
            }
            let mut back = vec![t];
            back.extend(inputs.iter().map(|l| l.negate()));
            ctx.push_clause(Clause::new(back));
        } else {
            // t → some input; each input → t
            let mut forward = vec![t.negate()];
            forward.extend(inputs.iter().copied());
            ctx.push_clause(Clause::new(forward));
            for &input in &inputs {
                ctx.push_clause(Clause::new(vec![t, input.negate()]));
            }
        }

        self.definitions.insert(formula.clone(), t);
        t
    }

    fn polarised(literal: Literal, positive: bool) -> Literal {
        if positive {
            literal
        } else {
            literal.negate()
        }
    }
}

/// Remove repeated literals inside clauses, tautological clauses and
/// duplicate clauses. The first occurrence of every clause keeps its position.
pub fn simplify(clauses: Vec<Clause>) -> (Vec<Clause>, CompilationStatistics) {
    let mut statistics = CompilationStatistics::default();
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(clauses.len());

    for clause in clauses {
        let before = clause.len();
        let clause = Clause::new(clause.literals.into_iter().unique().collect());
        statistics.duplicate_literals_removed += before - clause.len();

        if clause.is_tautology() {
            statistics.tautologies_removed += 1;
            continue;
        }
        if !seen.insert(clause.set_key()) {
            statistics.duplicate_clauses_removed += 1;
            continue;
        }
        result.push(clause);
    }

    (result, statistics)
}
