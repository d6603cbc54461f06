//! Error types shared by the forward (encode) and reverse (reconstruct) paths

use thiserror::Error;

pub type SchurResult<T> = Result<T, SchurError>;

#[derive(Error, Debug)]
pub enum SchurError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Malformed variable mapping at line {line}: {reason}")]
    MalformedMapping { line: usize, reason: String },
    #[error("Malformed assignment token '{token}': {reason}")]
    MalformedAssignment { token: String, reason: String },
    #[error("Atom {0} has no id in the variable mapping")]
    UnmappedAtom(String),
    #[error("IO error, more details: {0}")]
    Io(#[from] std::io::Error),
}

impl SchurError {
    pub(crate) fn mapping(line: usize, reason: impl Into<String>) -> Self {
        SchurError::MalformedMapping {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn assignment(token: impl Into<String>, reason: impl Into<String>) -> Self {
        SchurError::MalformedAssignment {
            token: token.into(),
            reason: reason.into(),
        }
    }
}
