//! Error types shared by the scheduler, the placement estimator and the review store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TutorError {
    /// Review grade outside 0..=5
    #[error("Invalid quality {0}: expected an integer in 0..=5")]
    InvalidQuality(i64),

    /// Evaluation payload failed dimension-score validation
    #[error("Invalid dimension scores: {}", .0.join("; "))]
    InvalidScores(Vec<String>),

    #[error("Invalid confidence {0}: expected a value in 0.0..=1.0")]
    InvalidConfidence(f64),

    /// A persisted record breaks a scheduling or session invariant
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Optimistic version check failed on write-back
    #[error("Version conflict for {key}: expected {expected:?}, found {found:?}")]
    Conflict {
        key: String,
        expected: Option<u64>,
        found: Option<u64>,
    },

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TutorError>;
