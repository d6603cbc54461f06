//! Typed boolean atoms and literals used throughout the encoding

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const COLOR_PREFIX: &str = "color_";
const AUX_PREFIX: &str = "tseitin_";

/// A named boolean proposition.
///
/// Colour atoms carry the domain meaning "item has label". Auxiliary atoms are
/// introduced by the CNF compiler and live in their own `tseitin_` namespace, so
/// their canonical names can never collide with a colour atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    Color { item: usize, label: usize },
    Aux { index: usize },
}

impl Atom {
    pub fn color(item: usize, label: usize) -> Self {
        Atom::Color { item, label }
    }

    pub fn is_auxiliary(&self) -> bool {
        matches!(self, Atom::Aux { .. })
    }

    pub fn positive(self) -> Literal {
        Literal::new(self, true)
    }

    pub fn negative(self) -> Literal {
        Literal::new(self, false)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Color { item, label } => write!(f, "{}{}_{}", COLOR_PREFIX, item, label),
            Atom::Aux { index } => write!(f, "{}{}", AUX_PREFIX, index),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a recognised atom name")]
pub struct ParseAtomError(pub String);

impl FromStr for Atom {
    type Err = ParseAtomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAtomError(s.to_string());

        if let Some(rest) = s.strip_prefix(COLOR_PREFIX) {
            let (item, label) = rest.split_once('_').ok_or_else(err)?;
            let item = parse_index(item).ok_or_else(err)?;
            let label = parse_index(label).ok_or_else(err)?;
            return Ok(Atom::Color { item, label });
        }

        if let Some(rest) = s.strip_prefix(AUX_PREFIX) {
            let index = parse_index(rest).ok_or_else(err)?;
            return Ok(Atom::Aux { index });
        }

        Err(err())
    }
}

/// Plain decimal digits only, so `color_+1_0` or `color_1_0_2` are rejected
/// and every parsed atom formats back to the exact same name.
fn parse_index(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

/// An atom paired with a polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    pub atom: Atom,
    pub positive: bool,
}

impl Literal {
    pub fn new(atom: Atom, positive: bool) -> Self {
        Self { atom, positive }
    }

    pub fn negate(self) -> Self {
        Self {
            atom: self.atom,
            positive: !self.positive,
        }
    }

    pub fn is_complementary(&self, other: &Literal) -> bool {
        self.atom == other.atom && self.positive != other.positive
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "{}", self.atom)
        } else {
            write!(f, "¬{}", self.atom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names() {
        assert_eq!(Atom::color(3, 1).to_string(), "color_3_1");
        assert_eq!(Atom::Aux { index: 7 }.to_string(), "tseitin_7");
    }

    #[test]
    fn test_parse_round_trips_canonical_name() {
        let atom: Atom = "color_12_4".parse().unwrap();
        assert_eq!(atom, Atom::color(12, 4));
        assert_eq!(atom.to_string(), "color_12_4");

        let aux: Atom = "tseitin_0".parse().unwrap();
        assert!(aux.is_auxiliary());
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        for name in ["x", "color_1", "color_a_0", "color_1_2_3", "color_01_0", "color_-1_0", "tseitin_"] {
            assert!(name.parse::<Atom>().is_err(), "{} should not parse", name);
        }
    }

    #[test]
    fn test_total_order() {
        let mut atoms = vec![Atom::color(2, 0), Atom::color(0, 1), Atom::color(0, 0)];
        atoms.sort();
        assert_eq!(atoms, vec![Atom::color(0, 0), Atom::color(0, 1), Atom::color(2, 0)]);
    }

    #[test]
    fn test_complementary_literals() {
        let a = Atom::color(0, 0);
        assert!(a.positive().is_complementary(&a.negative()));
        assert!(!a.positive().is_complementary(&a.positive()));
        assert!(!a.positive().is_complementary(&Atom::color(0, 1).negative()));
        assert_eq!(a.positive().negate(), a.negative());
    }
}
