//! Error types for the football ingestion pipeline

use serde::Serialize;
use thiserror::Error;

#[cfg(test)]
mod tests;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("Failed to parse number: {0}")]
    InvalidNumber(#[from] std::num::ParseIntError),

    #[error("Invalid day offset {offset}: day must be an integer between 0 and {max}")]
    InvalidDayOffset { offset: i64, max: u8 },

    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Missing field `{field}` in {context}")]
    MissingField { field: String, context: String },

    #[error("No player statistics for {player}")]
    NoPlayerStatistics { player: String },

    #[error("Insufficient match statistics: {groups} of 3 required groups present")]
    InsufficientStatistics { groups: u8 },

    #[error("API returned no data for {url}")]
    NoData { url: String },

    #[error("Invalid configuration for {key}: {message}")]
    Config { key: String, message: String },
}

impl IngestError {
    /// Whether the error was caused by caller input rather than by the pipeline.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            IngestError::InvalidDayOffset { .. }
                | IngestError::InvalidDate { .. }
                | IngestError::InvalidNumber(_)
                | IngestError::Config { .. }
        )
    }

    /// Fixed status code reported to callers of the outward-facing surface.
    pub fn status_code(&self) -> u16 {
        if self.is_invalid_input() {
            400
        } else {
            500
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            status: self.status_code(),
            error: self.to_string(),
        }
    }
}

/// Structured error body handed back to whoever invoked the ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub status: u16,
    pub error: String,
}
