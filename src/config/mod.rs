//! Configuration management for the Schur SAT encoder

pub mod settings;

pub use settings::{
    Settings, ProblemConfig, EncodingConfig, OutputConfig, AtMostOneEncoding, ArtifactFormat,
    ReconstructionFormat, CliOverrides
};
