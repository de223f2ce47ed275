//! Error types for the talent tree.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TalentError {
    #[error("no talent data found; run `talentctl init` first")]
    NoState,

    #[error("talent \"{0}\" not found")]
    TalentNotFound(String),

    #[error("talent already at max level ({0})")]
    MaxLevelReached(u8),

    #[error("no talent points available")]
    InsufficientPoints,

    #[error("invalid branch: {0} (valid: security, development, automation, research)")]
    InvalidBranch(String),

    #[error("preset \"{0}\" not found")]
    UnknownPreset(String),

    #[error("not a valid talent build file")]
    InvalidBuild,

    #[error("invalid share code")]
    InvalidShareCode,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
