//! Error types for Horizon

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// No usable observations for the indicator (or an unresolvable reference)
    #[error("Missing data for {indicator}: {reason}")]
    MissingData { indicator: String, reason: String },

    /// Too few distinct points to fit a trend
    #[error("Insufficient history for {indicator}: {points} point(s), need at least 2")]
    InsufficientHistory { indicator: String, points: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
