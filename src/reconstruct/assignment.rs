//! Parsing of solver assignments (signed variable ids)

use crate::error::{SchurError, SchurResult};
use std::collections::BTreeMap;

/// Truth values reported by a solver, keyed by variable id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<u32, bool>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<I: IntoIterator<Item = (u32, bool)>>(values: I) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Parse whitespace-separated signed ids: `7` means variable 7 is true,
    /// `-7` means it is false.
    ///
    /// Solver output conventions are tolerated: `c` comment lines and `s`
    /// status lines are skipped, a leading `v` is dropped and `0` terminators
    /// are ignored. An id given twice is rejected rather than resolved.
    pub fn parse(content: &str) -> SchurResult<Self> {
        let mut values = BTreeMap::new();

        for line in content.lines() {
            let mut tokens = line.split_whitespace().peekable();
            match tokens.peek().copied() {
                Some("c") => continue,
                Some("s") => {
                    if let Some(status) = line.split_whitespace().nth(1) {
                        if status.contains("UNSAT") {
                            return Err(SchurError::assignment(
                                status,
                                "the solver reported the instance unsatisfiable",
                            ));
                        }
                    }
                    continue;
                }
                Some("v") => {
                    tokens.next();
                }
                _ => {}
            }

            for token in tokens {
                if token == "0" {
                    continue;
                }
                let (id, value) = parse_token(token)?;
                if values.insert(id, value).is_some() {
                    return Err(SchurError::assignment(token, "variable id assigned more than once"));
                }
            }
        }

        Ok(Self { values })
    }

    pub fn value(&self, id: u32) -> Option<bool> {
        self.values.get(&id).copied()
    }

    /// Entries in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        self.values.iter().map(|(&id, &value)| (id, value))
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render as a single line of signed ids in ascending id order
    pub fn to_text(&self) -> String {
        let tokens: Vec<String> = self
            .iter()
            .map(|(id, value)| if value { id.to_string() } else { format!("-{}", id) })
            .collect();
        let mut text = tokens.join(" ");
        text.push('\n');
        text
    }
}

fn parse_token(token: &str) -> SchurResult<(u32, bool)> {
    let (digits, value) = match token.strip_prefix('-') {
        Some(rest) => (rest, false),
        None => (token, true),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SchurError::assignment(token, "not a signed integer"));
    }
    let id: u32 = digits
        .parse()
        .map_err(|_| SchurError::assignment(token, "variable id out of range"))?;
    if id == 0 {
        return Err(SchurError::assignment(token, "variable ids must be positive"));
    }

    Ok((id, value))
}
