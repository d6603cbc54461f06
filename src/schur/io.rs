//! Solver artifacts: DIMACS CNF, the variable mapping file and SMT-LIB text

use super::schur_triples;
use crate::error::{SchurError, SchurResult};
use crate::sat::{Clause, Constraint, VariableMapping};
use crate::sat::atoms::Atom;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

/// Write `clauses` in DIMACS CNF format.
///
/// `p cnf <num_vars> <num_clauses>` followed by one `0`-terminated line per clause.
pub fn write_dimacs<W: Write>(out: &mut W, clauses: &[Clause], mapping: &VariableMapping) -> SchurResult<()> {
    writeln!(out, "p cnf {} {}", mapping.len(), clauses.len())?;
    for clause in clauses {
        for literal in mapping.encode_clause(clause)? {
            write!(out, "{} ", literal)?;
        }
        writeln!(out, "0")?;
    }
    Ok(())
}

/// Write one `<atom_name> <id>` line per variable, in id order
pub fn write_mapping<W: Write>(out: &mut W, mapping: &VariableMapping) -> SchurResult<()> {
    for (name, id) in mapping.iter() {
        writeln!(out, "{} {}", name, id)?;
    }
    Ok(())
}

/// Parse a mapping file. Blank lines are ignored; everything else must be a
/// `<name> <positive id>` pair and the whole file must form a bijection.
pub fn parse_mapping(content: &str) -> SchurResult<VariableMapping> {
    let mut mapping = VariableMapping::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let mut parts = line.split_whitespace();
        let (name, id) = match (parts.next(), parts.next(), parts.next()) {
            (None, _, _) => continue,
            (Some(name), Some(id), None) => (name, id),
            _ => return Err(SchurError::mapping(line_no, "expected '<name> <id>'")),
        };

        let id: u32 = id
            .parse()
            .map_err(|_| SchurError::mapping(line_no, format!("'{}' is not a valid id", id)))?;

        mapping
            .insert(name.to_string(), id)
            .map_err(|reason| SchurError::mapping(line_no, reason))?;
    }

    Ok(mapping)
}

/// Load a mapping file from disk
pub fn load_mapping_from_file<P: AsRef<Path>>(path: P) -> SchurResult<VariableMapping> {
    let content = std::fs::read_to_string(path)?;
    parse_mapping(&content)
}

/// Render the unflattened constraint tree as SMT-LIB: one boolean declaration
/// per atom, one assertion per constraint
pub fn write_smt2<W: Write>(out: &mut W, atoms: &BTreeSet<Atom>, constraints: &[Constraint]) -> SchurResult<()> {
    writeln!(out, "(set-logic QF_UF)")?;
    for atom in atoms {
        writeln!(out, "(declare-fun {} () Bool)", atom)?;
    }
    for constraint in constraints {
        writeln!(out, "(assert {})", constraint.formula)?;
    }
    writeln!(out, "(check-sat)")?;
    Ok(())
}

/// Render the integer-domain model: `color_<item>` ranges over 0..labels and
/// no triple may have three equal colours
pub fn write_integer_smt2<W: Write>(out: &mut W, items: usize, labels: usize) -> SchurResult<()> {
    writeln!(out, "(set-logic QF_LIA)")?;
    for item in 0..items {
        writeln!(out, "(declare-fun color_{} () Int)", item)?;
    }
    for item in 0..items {
        writeln!(out, "(assert (and (>= color_{0} 0) (< color_{0} {1})))", item, labels)?;
    }
    for triple in schur_triples(items) {
        let [a, b, c] = triple.items();
        writeln!(
            out,
            "(assert (or (distinct color_{0} color_{1}) (distinct color_{0} color_{2})))",
            a, b, c
        )?;
    }
    writeln!(out, "(check-sat)")?;
    Ok(())
}

/// Create `path` (and its parent directories) and fill it with `render`
pub fn save_to_file<P, F>(path: P, render: F) -> SchurResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut std::io::BufWriter<std::fs::File>) -> SchurResult<()>,
{
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    render(&mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{ConstraintKind, Formula, VariableManager};
    use tempfile::tempdir;

    fn sample_clauses() -> Vec<Clause> {
        vec![
            Clause::new(vec![Atom::color(0, 0).positive(), Atom::color(0, 1).positive()]),
            Clause::new(vec![Atom::color(0, 0).negative(), Atom::color(0, 1).negative()]),
            Clause::unit(Atom::color(1, 1).positive()),
        ]
    }

    #[test]
    fn test_dimacs_output() {
        let clauses = sample_clauses();
        let mapping = VariableManager::intern(&clauses);
        let mut out = Vec::new();
        write_dimacs(&mut out, &clauses, &mapping).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "p cnf 3 3\n1 2 0\n-1 -2 0\n3 0\n"
        );
    }

    #[test]
    fn test_mapping_round_trip() {
        let mapping = VariableManager::intern(&sample_clauses());
        let mut out = Vec::new();
        write_mapping(&mut out, &mapping).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, "color_0_0 1\ncolor_0_1 2\ncolor_1_1 3\n");
        assert_eq!(parse_mapping(&text).unwrap(), mapping);
    }

    #[test]
    fn test_malformed_mapping() {
        let cases = [
            "color_0_0\n",
            "color_0_0 1 2\n",
            "color_0_0 one\n",
            "color_0_0 -1\n",
            "color_0_0 0\n",
            "a 1\nb 1\n",
            "a 1\na 2\n",
        ];
        for content in cases {
            assert!(
                matches!(parse_mapping(content), Err(SchurError::MalformedMapping { .. })),
                "{:?} should be rejected",
                content
            );
        }

        match parse_mapping("a 1\n\nb x\n") {
            Err(SchurError::MalformedMapping { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_smt2_output() {
        let atoms: BTreeSet<_> = [Atom::color(0, 0), Atom::color(0, 1)].into_iter().collect();
        let constraints = vec![Constraint::new(
            ConstraintKind::AtLeastOne { item: 0 },
            Formula::or_of(atoms.iter().copied()),
        )];
        let mut out = Vec::new();
        write_smt2(&mut out, &atoms, &constraints).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "(set-logic QF_UF)\n\
             (declare-fun color_0_0 () Bool)\n\
             (declare-fun color_0_1 () Bool)\n\
             (assert (or color_0_0 color_0_1))\n\
             (check-sat)\n"
        );
    }

    #[test]
    fn test_integer_smt2_output() {
        let mut out = Vec::new();
        write_integer_smt2(&mut out, 2, 2).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("(declare-fun color_1 () Int)"));
        assert!(text.contains("(assert (and (>= color_0 0) (< color_0 2)))"));
        assert!(text.contains("(assert (or (distinct color_0 color_0) (distinct color_0 color_1)))"));
    }

    #[test]
    fn test_save_to_file_creates_directories() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested/out.var_mapping");
        let mapping = VariableManager::intern(&sample_clauses());

        save_to_file(&path, |out| write_mapping(out, &mapping)).unwrap();
        assert_eq!(load_mapping_from_file(&path).unwrap(), mapping);
    }
}
