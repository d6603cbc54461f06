//! SAT encoding components for the Schur colouring problem

pub mod atoms;
pub mod formula;
pub mod context;
pub mod constraints;
pub mod compiler;
pub mod variables;
pub mod encoder;
pub mod solver;

pub use atoms::{Atom, Literal};
pub use formula::Formula;
pub use context::CompilationContext;
pub use constraints::{Constraint, ConstraintGenerator, ConstraintKind};
pub use compiler::{Clause, CnfCompiler, CompiledCnf};
pub use variables::{VariableManager, VariableMapping};
pub use encoder::{Encoding, SatEncoder};
pub use solver::{SatSolver, SolverSolution};
