//! Error types for pword

use std::path::PathBuf;

use thiserror::Error;

use crate::{engine::Phase, roster::Team};

/// Why the engine refused an intent.
///
/// A rejected intent never mutates the session, so callers are free to
/// ignore this value; the front end only logs it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    #[error("player name must not be blank")]
    BlankName,

    #[error("no player at position {0}")]
    NoSuchPlayer(usize),

    #[error("{0} has no players")]
    EmptyTeam(Team),

    #[error("intent requires phase {expected}, game is in {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("round clock is not running")]
    ClockStopped,

    #[error("round duration must be positive, got {0}s")]
    InvalidDuration(u32),
}

/// Failures loading a canonical word list.
#[derive(Error, Debug)]
pub enum WordListError {
    #[error("word list not found: {0}")]
    NotFound(String),

    #[error("word list {0} is not valid UTF-8")]
    NotUtf8(String),

    #[error("failed to read word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid word list json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("round duration must be positive")]
    ZeroDuration,
}
