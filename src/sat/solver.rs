//! In-process SAT solving using CaDiCaL

use super::compiler::Clause;
use super::variables::VariableMapping;
use crate::error::{SchurError, SchurResult};
use crate::reconstruct::Assignment;
use cadical::Solver;
use std::time::{Duration, Instant};

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
}

/// Result of SAT solving
#[derive(Debug, Clone)]
pub struct SolverSolution {
    pub assignment: Assignment,
    pub solve_time: Duration,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
        }
    }

    /// Add clauses to the solver, numbering atoms through `mapping`
    pub fn add_clauses(&mut self, clauses: &[Clause], mapping: &VariableMapping) -> SchurResult<()> {
        self.variable_count = self.variable_count.max(mapping.len());
        for clause in clauses {
            let literals = mapping.encode_clause(clause)?;
            self.add_clause(&literals)?;
        }
        Ok(())
    }

    /// Add a single DIMACS clause to the solver. An empty clause makes the
    /// instance unsatisfiable.
    pub fn add_clause(&mut self, literals: &[i64]) -> SchurResult<()> {
        let literals = literals
            .iter()
            .map(|&literal| {
                i32::try_from(literal).map_err(|_| {
                    SchurError::InvalidParameters(format!("literal {} exceeds the solver's range", literal))
                })
            })
            .collect::<SchurResult<Vec<i32>>>()?;

        // Update variable count
        for &literal in &literals {
            let var = literal.unsigned_abs() as usize;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }

        self.solver.add_clause(literals);
        self.clause_count += 1;
        Ok(())
    }

    /// Solve the SAT problem and return the assignment, if any
    pub fn solve(&mut self) -> Option<SolverSolution> {
        let start_time = Instant::now();
        let result = self.solver.solve();
        let solve_time = start_time.elapsed();

        if result == Some(true) {
            Some(SolverSolution {
                assignment: self.extract_assignment(),
                solve_time,
            })
        } else {
            None
        }
    }

    /// Extract variable assignment from the solver
    fn extract_assignment(&self) -> Assignment {
        Assignment::from_values((1..=self.variable_count as i32).filter_map(|var| {
            self.solver
                .value(var)
                .map(|value| (var.unsigned_abs(), value))
        }))
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SolverSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solution:")?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  Variables assigned: {}", self.assignment.len())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::atoms::Atom;
    use crate::sat::VariableManager;

    #[test]
    fn test_solver_creation() {
        let solver = SatSolver::new();
        assert_eq!(solver.variable_count(), 0);
        assert_eq!(solver.clause_count(), 0);
    }

    #[test]
    fn test_simple_satisfiable() {
        let mut solver = SatSolver::new();

        // x1 ∨ x2, ¬x1 ∨ x2
        solver.add_clause(&[1, 2]).unwrap();
        solver.add_clause(&[-1, 2]).unwrap();

        let solution = solver.solve().unwrap();
        // x2 should be true to satisfy both clauses
        assert_eq!(solution.assignment.value(2), Some(true));
    }

    #[test]
    fn test_unsatisfiable() {
        let mut solver = SatSolver::new();
        solver.add_clause(&[1]).unwrap();
        solver.add_clause(&[-1]).unwrap();
        assert!(solver.solve().is_none());
    }

    #[test]
    fn test_clauses_through_mapping() {
        let a = Atom::color(0, 0);
        let b = Atom::color(0, 1);
        let clauses = vec![
            Clause::new(vec![a.positive(), b.positive()]),
            Clause::unit(a.negative()),
        ];
        let mapping = VariableManager::intern(&clauses);

        let mut solver = SatSolver::new();
        solver.add_clauses(&clauses, &mapping).unwrap();
        assert_eq!(solver.variable_count(), 2);

        let solution = solver.solve().unwrap();
        assert_eq!(solution.assignment.value(mapping.id_of_atom(&a).unwrap()), Some(false));
        assert_eq!(solution.assignment.value(mapping.id_of_atom(&b).unwrap()), Some(true));
    }

    #[test]
    fn test_variable_count_tracking() {
        let mut solver = SatSolver::new();
        solver.add_clause(&[1, -5, 3]).unwrap();
        assert_eq!(solver.variable_count(), 5);
        solver.add_clause(&[2, -7]).unwrap();
        assert_eq!(solver.variable_count(), 7);
    }
}
