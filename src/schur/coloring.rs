//! Colourings of 1..=n and their direct verification against Schur triples

use super::{schur_triples, SchurTriple};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

/// A complete colouring: `labels[item]` is the label of the integer `item + 1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coloring {
    pub labels: Vec<usize>,
}

impl Coloring {
    pub fn new(labels: Vec<usize>) -> Self {
        Self { labels }
    }

    pub fn items(&self) -> usize {
        self.labels.len()
    }

    pub fn label_of(&self, item: usize) -> Option<usize> {
        self.labels.get(item).copied()
    }

    /// Parse the two-line column format produced by reconstruction: item
    /// indices on the first line, labels in matching columns on the second
    pub fn parse_columns(content: &str) -> Result<Self> {
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());
        let items_line = lines.next().context("Colouring is empty")?;
        let labels_line = lines.next().context("Colouring is missing its label line")?;
        if lines.next().is_some() {
            anyhow::bail!("Colouring must consist of exactly two lines");
        }

        let items = parse_numbers(items_line).context("Invalid item line")?;
        let labels = parse_numbers(labels_line).context("Invalid label line")?;

        if items.len() != labels.len() {
            anyhow::bail!(
                "Item line has {} columns but label line has {}",
                items.len(),
                labels.len()
            );
        }
        for (expected, &item) in items.iter().enumerate() {
            if item != expected {
                anyhow::bail!("Expected item {} in column {}, found {}", expected, expected, item);
            }
        }

        Ok(Self::new(labels))
    }

    /// Load a colouring in column format from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read colouring file: {}", path.as_ref().display()))?;
        Self::parse_columns(&content)
            .with_context(|| format!("Failed to parse colouring from file: {}", path.as_ref().display()))
    }
}

fn parse_numbers(line: &str) -> Result<Vec<usize>> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse()
                .with_context(|| format!("'{}' is not a non-negative integer", token))
        })
        .collect()
}

/// Checks colourings against the arithmetic definition of the problem
pub struct ColoringValidator {
    labels: usize,
}

/// Result of colouring validation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub triples_checked: usize,
    /// Triples whose three members share a label, with that label
    pub monochromatic: Vec<(SchurTriple, usize)>,
    /// Items whose label is not below the label count
    pub labels_out_of_range: Vec<usize>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.monochromatic.is_empty() && self.labels_out_of_range.is_empty()
    }
}

impl ColoringValidator {
    pub fn new(labels: usize) -> Self {
        Self { labels }
    }

    pub fn validate(&self, coloring: &Coloring) -> ValidationReport {
        let triples = schur_triples(coloring.items());

        let monochromatic: Vec<_> = triples
            .par_iter()
            .filter_map(|triple| {
                let [a, b, c] = triple.items().map(|item| coloring.labels[item]);
                (a == b && b == c).then_some((*triple, a))
            })
            .collect();

        let labels_out_of_range = coloring
            .labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label >= self.labels)
            .map(|(item, _)| item)
            .collect();

        ValidationReport {
            triples_checked: triples.len(),
            monochromatic,
            labels_out_of_range,
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Colouring Validation:")?;
        writeln!(f, "  Triples checked: {}", self.triples_checked)?;
        writeln!(f, "  Monochromatic triples: {}", self.monochromatic.len())?;
        for (triple, label) in self.monochromatic.iter().take(5) {
            writeln!(f, "    {} (label {})", triple, label)?;
        }
        if self.monochromatic.len() > 5 {
            writeln!(f, "    ... and {} more", self.monochromatic.len() - 5)?;
        }
        if !self.labels_out_of_range.is_empty() {
            writeln!(f, "  Items with out-of-range labels: {:?}", self.labels_out_of_range)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_valid_two_colouring_of_four() {
        // 1 -> 0, 2 -> 1, 3 -> 1, 4 -> 0
        let coloring = Coloring::new(vec![0, 1, 1, 0]);
        let report = ColoringValidator::new(2).validate(&coloring);
        assert!(report.is_valid());
        assert_eq!(report.triples_checked, 4);
    }

    #[test]
    fn test_monochromatic_triple_detected() {
        // 1 + 1 = 2 with both in label 0
        let coloring = Coloring::new(vec![0, 0, 1]);
        let report = ColoringValidator::new(2).validate(&coloring);
        assert!(!report.is_valid());
        assert_eq!(report.monochromatic.len(), 1);
        assert_eq!(report.monochromatic[0].0, SchurTriple { a: 1, b: 1, c: 2 });
        assert_eq!(report.monochromatic[0].1, 0);
    }

    #[test]
    fn test_out_of_range_label() {
        let coloring = Coloring::new(vec![0, 3]);
        let report = ColoringValidator::new(2).validate(&coloring);
        assert_eq!(report.labels_out_of_range, vec![1]);
    }

    #[test]
    fn test_parse_columns() {
        let coloring = Coloring::parse_columns(" 0  1  2\n 0  1  1\n").unwrap();
        assert_eq!(coloring.labels, vec![0, 1, 1]);
        assert_eq!(coloring.label_of(2), Some(1));

        assert!(Coloring::parse_columns("0 1\n0\n").is_err());
        assert!(Coloring::parse_columns("1 0\n0 1\n").is_err());
        assert!(Coloring::parse_columns("0\n").is_err());
        assert!(Coloring::parse_columns("0 1\n0 x\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("coloring.txt");
        std::fs::write(&path, "0 1 2 3\n0 1 1 0\n").unwrap();

        let coloring = Coloring::load_from_file(&path).unwrap();
        assert_eq!(coloring.items(), 4);
    }
}
