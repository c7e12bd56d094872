//! Error types for the source adapters
//!
//! This module defines the fetch and parse errors shared by the LeetCode,
//! fallback helper and Advent of Code adapters.

use thiserror::Error;

/// Errors that can occur while retrieving data from an upstream source
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a platform-level mitigation (challenge page)
    #[error("Request blocked by upstream mitigation (status {0})")]
    SoftBlocked(u16),

    /// Server error with status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Fallback helper could not be run or exited unsuccessfully
    #[error("Fallback helper failed: {0}")]
    Helper(String),

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Whether a later attempt could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout | Self::SoftBlocked(_) => true,
            Self::ServerError(status) => *status >= 500 || *status == 429,
            Self::Helper(_) | Self::Decode(_) => false,
        }
    }
}

/// Errors that can occur while interpreting upstream content
#[derive(Error, Debug)]
pub enum ParseError {
    /// Puzzle title heading not found in HTML
    #[error("Title not found in puzzle page")]
    TitleNotFound,

    /// Response body is not the expected JSON envelope
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Payload is well-formed but lacks a required field
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Difficulty label not recognised
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
}
