//! Schur problem domain: triples, colourings and solver artifacts

pub mod coloring;
pub mod io;

pub use coloring::{Coloring, ColoringValidator, ValidationReport};
pub use io::{
    load_mapping_from_file, parse_mapping, save_to_file, write_dimacs, write_integer_smt2,
    write_mapping, write_smt2,
};

/// Integers a <= b with a + b = c.
///
/// Item indices are zero-based, so the integer `x` is item `x - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SchurTriple {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl SchurTriple {
    pub fn items(&self) -> [usize; 3] {
        [self.a - 1, self.b - 1, self.c - 1]
    }
}

impl std::fmt::Display for SchurTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {} = {}", self.a, self.b, self.c)
    }
}

/// All Schur triples over 1..=n, ordered by a then b
pub fn schur_triples(n: usize) -> Vec<SchurTriple> {
    let mut triples = Vec::with_capacity(triple_count(n));
    for a in 1..=n {
        for b in a..=n {
            let c = a + b;
            if c > n {
                break;
            }
            triples.push(SchurTriple { a, b, c });
        }
    }
    triples
}

/// Closed form of `schur_triples(n).len()`
pub fn triple_count(n: usize) -> usize {
    (1..=n / 2).map(|a| n - 2 * a + 1).sum()
}
