//! Reverse path: from solver output back to a colouring

pub mod assignment;
pub mod reconstructor;

pub use assignment::Assignment;
pub use reconstructor::{Fact, Finding, Reconstruction, SolutionReconstructor};
