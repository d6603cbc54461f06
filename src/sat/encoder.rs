//! SAT encoder for the Schur colouring problem: model, CNF and variable mapping

use super::atoms::Atom;
use super::compiler::{Clause, CnfCompiler, CompilationStatistics};
use super::constraints::{Constraint, ConstraintGenerator, ConstraintStatistics};
use super::context::CompilationContext;
use super::variables::{VariableManager, VariableMapping};
use crate::config::{ArtifactFormat, Settings};
use crate::error::SchurResult;
use crate::schur::io::{save_to_file, write_dimacs, write_integer_smt2, write_mapping, write_smt2};
use log::info;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Everything the forward path produces for one problem instance
#[derive(Debug, Clone)]
pub struct Encoding {
    /// The unflattened constraint tree (an implicit conjunction)
    pub constraints: Vec<Constraint>,
    /// Declared colour atoms
    pub atoms: BTreeSet<Atom>,
    pub clauses: Vec<Clause>,
    pub mapping: VariableMapping,
    pub statistics: EncodingStatistics,
}

/// Main SAT encoder for Schur problems
pub struct SatEncoder {
    settings: Settings,
    generator: ConstraintGenerator,
}

impl SatEncoder {
    /// Create a new SAT encoder with the given settings
    pub fn new(settings: Settings) -> SchurResult<Self> {
        let generator = ConstraintGenerator::new(
            settings.problem.items,
            settings.problem.labels,
            settings.encoding.at_most_one,
            settings.encoding.symmetry_breaking,
        )?;

        Ok(Self { settings, generator })
    }

    /// Build the model, lower it to CNF and intern its atoms
    pub fn encode(&self) -> Encoding {
        let mut ctx = CompilationContext::new();
        let constraints = self.generator.generate_all_constraints(&mut ctx);
        let cnf = CnfCompiler::new().compile(&mut ctx, &constraints);
        let mapping = VariableManager::intern(&cnf.clauses);

        let statistics = EncodingStatistics {
            items: self.settings.problem.items,
            labels: self.settings.problem.labels,
            constraints: ConstraintGenerator::statistics(&constraints),
            compilation: cnf.statistics,
            total_variables: mapping.len(),
            total_clauses: cnf.clauses.len(),
            expected_core_clauses: self.generator.expected_core_clause_count(),
        };

        info!(
            "Encoded n={}, k={}: {} variables, {} clauses",
            statistics.items, statistics.labels, statistics.total_variables, statistics.total_clauses
        );

        Encoding {
            constraints,
            atoms: ctx.atoms().clone(),
            clauses: cnf.clauses,
            mapping,
            statistics,
        }
    }

    /// Write the artifacts selected by the output format into `directory`,
    /// returning the paths written
    pub fn write_artifacts(&self, encoding: &Encoding, directory: &Path) -> SchurResult<Vec<PathBuf>> {
        self.write_artifacts_as(encoding, directory, self.settings.output.format)
    }

    /// Write the artifacts of `format` regardless of the configured one
    pub fn write_artifacts_as(
        &self,
        encoding: &Encoding,
        directory: &Path,
        format: ArtifactFormat,
    ) -> SchurResult<Vec<PathBuf>> {
        let stem = self.settings.artifact_stem();
        let mut written = Vec::new();

        match format {
            ArtifactFormat::Dimacs => {
                let cnf_path = directory.join(format!("{}.dimacs", stem));
                save_to_file(&cnf_path, |out| write_dimacs(out, &encoding.clauses, &encoding.mapping))?;
                written.push(cnf_path);

                let mapping_path = directory.join(format!("{}.var_mapping", stem));
                save_to_file(&mapping_path, |out| write_mapping(out, &encoding.mapping))?;
                written.push(mapping_path);
            }
            ArtifactFormat::Smt2 => {
                let path = directory.join(format!("{}_sat.smt2", stem));
                save_to_file(&path, |out| write_smt2(out, &encoding.atoms, &encoding.constraints))?;
                written.push(path);
            }
            ArtifactFormat::Smt2Integer => {
                let path = directory.join(format!("{}_smt.smt2", stem));
                save_to_file(&path, |out| {
                    write_integer_smt2(out, self.settings.problem.items, self.settings.problem.labels)
                })?;
                written.push(path);
            }
        }

        for path in &written {
            info!("Wrote {}", path.display());
        }
        Ok(written)
    }

    /// Path the assignment of an in-process solve is stored at
    pub fn solution_path(&self, directory: &Path) -> PathBuf {
        directory.join(format!("{}_sol.txt", self.settings.artifact_stem()))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub items: usize,
    pub labels: usize,
    pub constraints: ConstraintStatistics,
    pub compilation: CompilationStatistics,
    pub total_variables: usize,
    pub total_clauses: usize,
    /// Closed-form clause count of the core constraints alone
    pub expected_core_clauses: usize,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Items: {}", self.items)?;
        writeln!(f, "  Labels: {}", self.labels)?;
        write!(f, "{}", self.constraints)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Auxiliary variables: {}", self.compilation.auxiliary_atoms)?;
        writeln!(f, "  Constraints already in clause form: {}", self.compilation.direct_clauses)?;
        writeln!(f, "  Deepest constraint: {}", self.compilation.max_depth)?;
        writeln!(f, "  Raw clauses: {}", self.compilation.raw_clauses)?;
        writeln!(f, "  Duplicate clauses removed: {}", self.compilation.duplicate_clauses_removed)?;
        writeln!(f, "  Tautologies removed: {}", self.compilation.tautologies_removed)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        writeln!(f, "  Expected core clauses: {}", self.expected_core_clauses)?;
        Ok(())
    }
}
