//! # Error Module
//!
//! Every failure the library can surface is a [`TuneError`]. The binary wraps
//! these in `anyhow` for context and maps them back to process exit codes via
//! [`TuneError::exit_code`].

use crate::tune::TuneRecord;
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, TuneError>;

/// Exit code for a successful run.
pub const EXIT_OK: u8 = 0;
/// Exit code for bad arguments or an unusable query.
pub const EXIT_USAGE: u8 = 1;
/// Exit code when the requested data does not exist.
pub const EXIT_NOT_FOUND: u8 = 2;
/// Exit code when the tune list, weights or config could not be loaded.
pub const EXIT_LOAD: u8 = 3;

/// Which half of the set walk a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Forward,
    Backward,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Forward => write!(f, "forward"),
            Phase::Backward => write!(f, "backward"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TuneError {
    #[error("Failed to load tune list from `{location}`: {reason}")]
    Load { location: String, reason: String },

    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Invalid difficulty `{0}`: expected `*` followed by `=`, `l` or `g` and one digit (e.g. `*=2`)")]
    InvalidDifficultyFormat(String),

    #[error("No tune found with a title containing `{0}`")]
    TuneNotFound(String),

    #[error("{} tunes match `{title}`; choose one of 1..={}", .candidates.len(), .candidates.len())]
    AmbiguousSelection {
        title: String,
        candidates: Vec<TuneRecord>,
        choice: Option<usize>,
    },

    #[error("Gave up after {attempts} {phase} draws from `{key}`: no unused tune fits")]
    CandidatePoolExhausted {
        phase: Phase,
        key: String,
        attempts: usize,
    },

    #[error("Invalid set shape: position {position} is outside a set of {length}")]
    InvalidSetShape { length: usize, position: usize },

    #[error("Cannot make a weighted choice from an empty or invalid weight list")]
    EmptyWeights,

    #[error("Invalid transition weights: {0}")]
    Weights(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TuneError {
    /// Process exit code for this error category.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            TuneError::MalformedQuery(_)
            | TuneError::InvalidDifficultyFormat(_)
            | TuneError::AmbiguousSelection { .. }
            | TuneError::InvalidSetShape { .. }
            | TuneError::EmptyWeights => EXIT_USAGE,
            TuneError::TuneNotFound(_) | TuneError::CandidatePoolExhausted { .. } => EXIT_NOT_FOUND,
            TuneError::Load { .. } | TuneError::Weights(_) | TuneError::Config(_) => EXIT_LOAD,
        }
    }

    pub(crate) fn load(location: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        TuneError::Load {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
