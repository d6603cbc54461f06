//! Main CLI application for the Schur SAT encoder

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn, Level, LevelFilter};
use schur_sat::{
    config::{ArtifactFormat, CliOverrides, Settings},
    reconstruct::{Assignment, SolutionReconstructor},
    sat::{SatEncoder, SatSolver},
    schur::{load_mapping_from_file, save_to_file, Coloring, ColoringValidator},
    utils::{ColorOutput, ReconstructionFormatter},
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "schur_sat")]
#[command(about = "Schur number SAT encoder")]
#[command(version = "0.1.0")]
struct Cli {
    /// Log progress and statistics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ProblemArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Number of items n (overrides config)
    #[arg(short = 'n', long)]
    items: Option<usize>,

    /// Number of labels k (overrides config)
    #[arg(short = 'k', long)]
    labels: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a problem and write solver artifacts
    Encode {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Artifact format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave out symmetry breaking constraints
        #[arg(long)]
        no_symmetry_breaking: bool,
    },

    /// Encode, solve in-process with CaDiCaL and reconstruct the colouring
    Solve {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave out symmetry breaking constraints
        #[arg(long)]
        no_symmetry_breaking: bool,

        /// Print the reconstruction as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recover a colouring from a solver assignment and a variable mapping
    Reconstruct {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Variable mapping file written by `encode`
        #[arg(short, long)]
        mapping: PathBuf,

        /// Solver assignment (signed variable ids)
        #[arg(short, long)]
        assignment: PathBuf,

        /// Print the reconstruction as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a colouring directly against every Schur triple
    Verify {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Colouring in the two-line column format
        #[arg(long)]
        coloring: PathBuf,
    },

    /// Create a default configuration file
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Dimacs,
    Smt2,
    Smt2Integer,
}

impl From<FormatArg> for ArtifactFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Dimacs => ArtifactFormat::Dimacs,
            FormatArg::Smt2 => ArtifactFormat::Smt2,
            FormatArg::Smt2Integer => ArtifactFormat::Smt2Integer,
        }
    }
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "c ")?;
            write!(buf, "{} ", record.level())?;
            if record.level() > Level::Info {
                write!(
                    buf,
                    "[{}:{}] ",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0)
                )?;
            }
            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();
    info!("Logging successfully configured");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.verbose);

    match cli.command {
        Commands::Encode {
            problem, format, output, no_symmetry_breaking
        } => {
            let overrides = CliOverrides {
                format: format.map(ArtifactFormat::from),
                output_dir: output,
                no_symmetry_breaking,
                ..problem.overrides()
            };
            encode_command(load_settings(&problem.config, &overrides)?, cli.verbose)
        }
        Commands::Solve {
            problem, output, no_symmetry_breaking, json
        } => {
            let overrides = CliOverrides {
                output_dir: output,
                no_symmetry_breaking,
                json,
                ..problem.overrides()
            };
            solve_command(load_settings(&problem.config, &overrides)?, cli.verbose)
        }
        Commands::Reconstruct { problem, mapping, assignment, json } => {
            let overrides = CliOverrides {
                json,
                ..problem.overrides()
            };
            reconstruct_command(load_settings(&problem.config, &overrides)?, mapping, assignment)
        }
        Commands::Verify { problem, coloring } => {
            verify_command(load_settings(&problem.config, &problem.overrides())?, coloring)
        }
        Commands::Setup { directory, force } => {
            setup_command(directory, force)
        }
    }
}

impl ProblemArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            items: self.items,
            labels: self.labels,
            ..CliOverrides::default()
        }
    }
}

/// Load configuration, falling back to defaults, and apply CLI overrides
fn load_settings(config_path: &PathBuf, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        warn!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate()
        .context("Configuration validation failed")?;
    Ok(settings)
}

fn encode_command(settings: Settings, verbose: bool) -> Result<()> {
    println!("{}", ColorOutput::info(&format!(
        "Writing files for n={}, k={}", settings.problem.items, settings.problem.labels
    )));

    let directory = settings.output.directory.clone();
    let encoder = SatEncoder::new(settings)
        .context("Failed to create encoder")?;
    let encoding = encoder.encode();

    let written = encoder.write_artifacts(&encoding, &directory)
        .context("Failed to write solver artifacts")?;
    for path in &written {
        println!("Created: {}", path.display());
    }

    if verbose {
        println!("\n{}", encoding.statistics);
    }

    Ok(())
}

fn solve_command(settings: Settings, verbose: bool) -> Result<()> {
    let (items, labels) = (settings.problem.items, settings.problem.labels);
    let directory = settings.output.directory.clone();
    let reconstruction_format = settings.output.reconstruction;

    let format = settings.output.format;
    let encoder = SatEncoder::new(settings)
        .context("Failed to create encoder")?;
    let encoding = encoder.encode();
    encoder.write_artifacts(&encoding, &directory)
        .context("Failed to write solver artifacts")?;
    if format != ArtifactFormat::Dimacs {
        // the solution file is only usable next to a variable mapping
        encoder.write_artifacts_as(&encoding, &directory, ArtifactFormat::Dimacs)
            .context("Failed to write variable mapping")?;
    }

    println!("{}", ColorOutput::info(&format!("Solving for n={}, k={}", items, labels)));
    let start_time = Instant::now();
    let mut solver = SatSolver::new();
    solver.add_clauses(&encoding.clauses, &encoding.mapping)
        .context("Failed to add clauses to SAT solver")?;
    info!(
        "Solver loaded {} variables, {} clauses",
        solver.variable_count(),
        solver.clause_count()
    );
    let solution = solver.solve();
    let total_time = start_time.elapsed();

    let Some(solution) = solution else {
        println!("{}", ColorOutput::warning(&format!(
            "No solution for n={}, k={} in {:.2}s", items, labels, total_time.as_secs_f64()
        )));
        return Ok(());
    };

    println!("{}", ColorOutput::success(&format!(
        "Solution for n={}, k={} found in {:.2}s", items, labels, total_time.as_secs_f64()
    )));
    if verbose {
        println!("{}", solution);
    }

    let solution_path = encoder.solution_path(&directory);
    let text = solution.assignment.to_text();
    save_to_file(&solution_path, |out| Ok(out.write_all(text.as_bytes())?))
        .with_context(|| format!("Failed to write assignment to {}", solution_path.display()))?;
    info!("Wrote {}", solution_path.display());

    let reconstruction = SolutionReconstructor::new(items, labels)?
        .reconstruct(&solution.assignment, &encoding.mapping);
    print!("{}", ReconstructionFormatter::format(&reconstruction, reconstruction_format)?);

    if let Some(coloring) = reconstruction.coloring() {
        let report = ColoringValidator::new(labels).validate(&coloring);
        if !report.is_valid() {
            anyhow::bail!("Solver assignment violates the encoding:\n{}", report);
        }
    }

    Ok(())
}

fn reconstruct_command(settings: Settings, mapping_path: PathBuf, assignment_path: PathBuf) -> Result<()> {
    let mapping = load_mapping_from_file(&mapping_path)
        .with_context(|| format!("Failed to load variable mapping from {}", mapping_path.display()))?;

    let content = std::fs::read_to_string(&assignment_path)
        .with_context(|| format!("Failed to read assignment from {}", assignment_path.display()))?;
    let assignment = Assignment::parse(&content)
        .with_context(|| format!("Failed to parse assignment from {}", assignment_path.display()))?;

    let reconstructor = SolutionReconstructor::new(settings.problem.items, settings.problem.labels)?;
    let reconstruction = reconstructor.reconstruct(&assignment, &mapping);

    print!("{}", ReconstructionFormatter::format(&reconstruction, settings.output.reconstruction)?);
    Ok(())
}

fn verify_command(settings: Settings, coloring_path: PathBuf) -> Result<()> {
    let coloring = Coloring::load_from_file(&coloring_path)?;
    if coloring.items() != settings.problem.items {
        warn!(
            "Colouring covers {} items but the problem has {}",
            coloring.items(), settings.problem.items
        );
    }

    let report = ColoringValidator::new(settings.problem.labels).validate(&coloring);
    println!("{}", report);

    if report.is_valid() {
        println!("{}", ColorOutput::success("Colouring is valid"));
        Ok(())
    } else {
        println!("{}", ColorOutput::error("Colouring is invalid"));
        anyhow::bail!("{} monochromatic triples found", report.monochromatic.len())
    }
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    let config_path = directory.join("config/default.yaml");
    if !config_path.exists() || force {
        Settings::default().to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "schur_sat",
            "encode",
            "--items", "44",
            "-k", "4",
            "--format", "smt2-integer",
        ]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from([
            "schur_sat", "reconstruct", "--mapping", "m.txt", "--assignment", "a.txt", "--json",
        ]);
        assert!(cli.is_ok());

        assert!(Cli::try_parse_from(["schur_sat", "encode", "--items", "-3"]).is_err());
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path().to_path_buf(), false).unwrap();
        assert!(temp_dir.path().join("config/default.yaml").exists());
    }

    #[test]
    fn test_solve_keeps_mapping_next_to_solution() {
        let temp_dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.problem.items = 4;
        settings.problem.labels = 2;
        settings.output.format = ArtifactFormat::Smt2;
        settings.output.directory = temp_dir.path().to_path_buf();

        solve_command(settings, false).unwrap();

        let mapping = load_mapping_from_file(temp_dir.path().join("schur_4_2.var_mapping")).unwrap();
        let content = std::fs::read_to_string(temp_dir.path().join("schur_4_2_sol.txt")).unwrap();
        let assignment = Assignment::parse(&content).unwrap();
        let reconstruction = SolutionReconstructor::new(4, 2)
            .unwrap()
            .reconstruct(&assignment, &mapping);
        assert!(reconstruction.findings.is_empty());
        assert!(temp_dir.path().join("schur_4_2_sat.smt2").exists());
    }

    #[test]
    fn test_load_settings_falls_back_to_defaults() {
        let temp_dir = tempdir().unwrap();
        let overrides = CliOverrides {
            items: Some(5),
            ..CliOverrides::default()
        };
        let settings = load_settings(&temp_dir.path().join("missing.yaml"), &overrides).unwrap();
        assert_eq!(settings.problem.items, 5);

        let overrides = CliOverrides {
            labels: Some(0),
            ..CliOverrides::default()
        };
        assert!(load_settings(&temp_dir.path().join("missing.yaml"), &overrides).is_err());
    }
}
