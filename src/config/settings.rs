//! Configuration settings for the Schur SAT encoder

use crate::error::{SchurError, SchurResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub problem: ProblemConfig,
    pub encoding: EncodingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Number of items (the integers 1..=items)
    pub items: usize,
    /// Number of colour classes
    pub labels: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub at_most_one: AtMostOneEncoding,
    pub symmetry_breaking: bool,
}

/// How "at most one label per item" is expressed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AtMostOneEncoding {
    /// One binary clause per pair of labels
    Pairwise,
    /// A single clause forbidding all labels at once. Weaker than at-most-one
    /// when there are more than two labels. With one label neither encoding
    /// emits anything.
    NegatedConjunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: ArtifactFormat,
    pub directory: PathBuf,
    pub reconstruction: ReconstructionFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactFormat {
    /// DIMACS CNF plus the variable mapping file
    Dimacs,
    /// The boolean constraint tree as SMT-LIB assertions
    Smt2,
    /// The integer-domain model as SMT-LIB assertions
    Smt2Integer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReconstructionFormat {
    Columns,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            problem: ProblemConfig {
                items: 44,
                labels: 4,
            },
            encoding: EncodingConfig {
                at_most_one: AtMostOneEncoding::Pairwise,
                symmetry_breaking: true,
            },
            output: OutputConfig {
                format: ArtifactFormat::Dimacs,
                directory: PathBuf::from("output"),
                reconstruction: ReconstructionFormat::Columns,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> SchurResult<()> {
        validate_parameters(self.problem.items, self.problem.labels)
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(items) = cli_overrides.items {
            self.problem.items = items;
        }
        if let Some(labels) = cli_overrides.labels {
            self.problem.labels = labels;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.directory = output_dir.clone();
        }
        if cli_overrides.no_symmetry_breaking {
            self.encoding.symmetry_breaking = false;
        }
        if cli_overrides.json {
            self.output.reconstruction = ReconstructionFormat::Json;
        }
    }

    /// Common stem of every artifact written for this problem
    pub fn artifact_stem(&self) -> String {
        format!("schur_{}_{}", self.problem.items, self.problem.labels)
    }
}

pub(crate) fn validate_parameters(items: usize, labels: usize) -> SchurResult<()> {
    if items == 0 {
        return Err(SchurError::InvalidParameters(
            "number of items must be positive".to_string(),
        ));
    }
    if labels == 0 {
        return Err(SchurError::InvalidParameters(
            "number of labels must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub items: Option<usize>,
    pub labels: Option<usize>,
    pub format: Option<ArtifactFormat>,
    pub output_dir: Option<PathBuf>,
    pub no_symmetry_breaking: bool,
    pub json: bool,
}
