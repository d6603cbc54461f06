//! Schur number SAT encoder
//!
//! Encodes "partition 1..=n into k classes with no a + b = c inside a class"
//! as CNF, writes DIMACS / SMT-LIB artifacts and reconstructs colourings from
//! solver assignments.

pub mod config;
pub mod error;
pub mod reconstruct;
pub mod sat;
pub mod schur;
pub mod utils;

pub use config::Settings;
pub use error::{SchurError, SchurResult};
pub use reconstruct::{Assignment, Reconstruction, SolutionReconstructor};
pub use sat::{Encoding, SatEncoder};

/// Main entry point for encoding a Schur problem
pub fn encode_problem(settings: Settings) -> SchurResult<Encoding> {
    let encoder = SatEncoder::new(settings)?;
    Ok(encoder.encode())
}
