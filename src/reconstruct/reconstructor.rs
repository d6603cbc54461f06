//! Recovery of (item, label) facts from a solver assignment and a variable mapping

use super::Assignment;
use crate::config::settings::validate_parameters;
use crate::error::SchurResult;
use crate::sat::{Atom, VariableMapping};
use crate::schur::Coloring;
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeSet;

/// "Item has label", recovered from a true colour atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Fact {
    pub item: usize,
    pub label: usize,
}

/// Non-fatal problems found while reconstructing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// The assignment and the mapping do not cover the same variable ids
    VariableUniverseMismatch {
        only_in_assignment: Vec<u32>,
        only_in_mapping: Vec<u32>,
    },
    /// An item has zero or several true labels
    CardinalityViolation { item: usize, labels: Vec<usize> },
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::VariableUniverseMismatch {
                only_in_assignment,
                only_in_mapping,
            } => {
                write!(f, "variable universe mismatch:")?;
                if !only_in_assignment.is_empty() {
                    write!(f, " ids in assignment but not in mapping {:?};", only_in_assignment)?;
                }
                if !only_in_mapping.is_empty() {
                    write!(f, " ids in mapping but not in assignment {:?};", only_in_mapping)?;
                }
                Ok(())
            }
            Finding::CardinalityViolation { item, labels } if labels.is_empty() => {
                write!(f, "item {} has no true label", item)
            }
            Finding::CardinalityViolation { item, labels } => {
                write!(f, "item {} has {} true labels {:?}", item, labels.len(), labels)
            }
        }
    }
}

/// Outcome of one reconstruction
#[derive(Debug, Clone, Serialize)]
pub struct Reconstruction {
    pub items: usize,
    /// Recovered facts in ascending item order (then label)
    pub facts: Vec<Fact>,
    /// Names of every mapped variable the assignment sets true, in id order
    pub true_atoms: Vec<String>,
    pub findings: Vec<Finding>,
}

impl Reconstruction {
    pub fn has_cardinality_violations(&self) -> bool {
        self.findings
            .iter()
            .any(|f| matches!(f, Finding::CardinalityViolation { .. }))
    }

    pub fn has_universe_mismatch(&self) -> bool {
        self.findings
            .iter()
            .any(|f| matches!(f, Finding::VariableUniverseMismatch { .. }))
    }

    /// The colouring, if every item resolved to exactly one label
    pub fn coloring(&self) -> Option<Coloring> {
        if self.has_cardinality_violations() || self.facts.len() != self.items {
            return None;
        }
        Some(Coloring::new(self.facts.iter().map(|fact| fact.label).collect()))
    }

    pub fn labels_of(&self, item: usize) -> Vec<usize> {
        self.facts
            .iter()
            .filter(|fact| fact.item == item)
            .map(|fact| fact.label)
            .collect()
    }
}

/// Turns a raw assignment back into a colouring of items 0..items
pub struct SolutionReconstructor {
    items: usize,
    labels: usize,
}

impl SolutionReconstructor {
    pub fn new(items: usize, labels: usize) -> SchurResult<Self> {
        validate_parameters(items, labels)?;
        Ok(Self { items, labels })
    }

    pub fn reconstruct(&self, assignment: &Assignment, mapping: &VariableMapping) -> Reconstruction {
        let mut findings = Vec::new();

        // 1. Cross-check the two variable universes
        let assigned: BTreeSet<u32> = assignment.ids().collect();
        let mapped: BTreeSet<u32> = mapping.ids().collect();
        let only_in_assignment: Vec<u32> = assigned.difference(&mapped).copied().collect();
        let only_in_mapping: Vec<u32> = mapped.difference(&assigned).copied().collect();

        if !only_in_assignment.is_empty() || !only_in_mapping.is_empty() {
            let finding = Finding::VariableUniverseMismatch {
                only_in_assignment,
                only_in_mapping,
            };
            warn!("{}", finding);
            findings.push(finding);
        }

        // 2. Resolve true ids that the mapping knows about
        let true_atoms: Vec<String> = assignment
            .iter()
            .filter(|&(_, value)| value)
            .filter_map(|(id, _)| mapping.name_of(id))
            .map(str::to_string)
            .collect();

        // 3. Keep colour atoms inside the expected domain
        let facts: BTreeSet<Fact> = true_atoms
            .iter()
            .filter_map(|name| match name.parse::<Atom>() {
                Ok(Atom::Color { item, label }) if item < self.items && label < self.labels => {
                    Some(Fact { item, label })
                }
                _ => {
                    debug!("Ignoring true atom {} outside the colour domain", name);
                    None
                }
            })
            .collect();
        let facts: Vec<Fact> = facts.into_iter().collect();

        // 4. Report items without exactly one label
        let mut reconstruction = Reconstruction {
            items: self.items,
            facts,
            true_atoms,
            findings,
        };
        for item in 0..self.items {
            let labels = reconstruction.labels_of(item);
            if labels.len() != 1 {
                let finding = Finding::CardinalityViolation { item, labels };
                warn!("{}", finding);
                reconstruction.findings.push(finding);
            }
        }

        reconstruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schur::parse_mapping;

    #[test]
    fn test_missing_label_reported() {
        let mapping = parse_mapping("color_0_0 1\ncolor_1_1 2\n").unwrap();
        let assignment = Assignment::parse("1 -2").unwrap();

        let result = SolutionReconstructor::new(2, 2)
            .unwrap()
            .reconstruct(&assignment, &mapping);

        assert_eq!(result.facts, vec![Fact { item: 0, label: 0 }]);
        assert!(!result.has_universe_mismatch());
        assert_eq!(
            result.findings,
            vec![Finding::CardinalityViolation { item: 1, labels: vec![] }]
        );
        assert!(result.coloring().is_none());
    }

    #[test]
    fn test_universe_mismatch_is_not_fatal() {
        let mapping = parse_mapping("x 1\n").unwrap();
        let assignment = Assignment::parse("2").unwrap();

        let result = SolutionReconstructor::new(1, 1)
            .unwrap()
            .reconstruct(&assignment, &mapping);

        assert!(result.true_atoms.is_empty());
        assert!(result.facts.is_empty());
        assert_eq!(
            result.findings[0],
            Finding::VariableUniverseMismatch {
                only_in_assignment: vec![2],
                only_in_mapping: vec![1],
            }
        );
    }

    #[test]
    fn test_multiple_labels_surface_as_is() {
        let mapping = parse_mapping("color_0_0 1\ncolor_0_1 2\ncolor_1_1 3\n").unwrap();
        let assignment = Assignment::parse("1 2 3").unwrap();

        let result = SolutionReconstructor::new(2, 2)
            .unwrap()
            .reconstruct(&assignment, &mapping);

        assert_eq!(result.labels_of(0), vec![0, 1]);
        assert_eq!(result.labels_of(1), vec![1]);
        assert_eq!(
            result.findings,
            vec![Finding::CardinalityViolation { item: 0, labels: vec![0, 1] }]
        );
    }

    #[test]
    fn test_consistent_colouring() {
        let mapping = parse_mapping(
            "color_1_1 1\ncolor_0_0 2\ncolor_0_1 3\ncolor_1_0 4\ntseitin_0 5\n",
        )
        .unwrap();
        let assignment = Assignment::parse("1 2 -3 -4 5").unwrap();

        let result = SolutionReconstructor::new(2, 2)
            .unwrap()
            .reconstruct(&assignment, &mapping);

        assert!(result.findings.is_empty());
        assert_eq!(result.true_atoms, vec!["color_1_1", "color_0_0", "tseitin_0"]);
        assert_eq!(result.coloring(), Some(Coloring::new(vec![0, 1])));
    }

    #[test]
    fn test_out_of_domain_atoms_are_ignored() {
        let mapping = parse_mapping("color_0_0 1\ncolor_5_0 2\ncolor_0_7 3\n").unwrap();
        let assignment = Assignment::parse("1 2 3").unwrap();

        let result = SolutionReconstructor::new(1, 2)
            .unwrap()
            .reconstruct(&assignment, &mapping);

        assert_eq!(result.facts, vec![Fact { item: 0, label: 0 }]);
        assert!(result.findings.is_empty());
    }
}
