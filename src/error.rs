//! Error types for content loading, save files and the scenario engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::content::Role;

/// Problems found while validating the content catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("role {0:?} has no chapters")]
    EmptyRole(Role),

    #[error("role {role:?}: expected chapter {expected}, found {found}")]
    ChapterGap { role: Role, expected: u32, found: u32 },

    #[error("duplicate scenario id {0:?}")]
    DuplicateScenario(String),

    #[error("{prompt}: duplicate choice id {choice:?}")]
    DuplicateChoice { prompt: String, choice: String },

    #[error("{prompt}: correct answer {correct:?} matches no choice")]
    UnknownCorrect { prompt: String, correct: String },

    #[error("{0}: needs at least two choices")]
    TooFewChoices(String),

    #[error("boss {0:?} has no attacks")]
    BossWithoutAttacks(String),

    #[error("boss {0:?} has zero health")]
    BossWithoutHealth(String),

    #[error("{0}: attack damage must be positive")]
    HarmlessAttack(String),

    #[error("{label}: value {value} is out of range")]
    OutOfRange { label: String, value: u32 },
}

/// Failures reading or writing the save snapshot. A missing file is not one
/// of these; `load_snapshot` reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not access save file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("save file is not a valid snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("save file key {0:?} is not a firewall snapshot")]
    WrongKey(String),

    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("snapshot rejected: {0}")]
    Invalid(String),
}

/// The presentation layer asked for something the current phase cannot do.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no question is waiting for an answer")]
    NoActivePrompt,

    #[error("choice {0:?} is not offered by the active question")]
    UnknownChoice(String),

    #[error("the active question was already answered")]
    AlreadyAnswered,

    #[error("cannot {action} while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: &'static str,
    },
}
