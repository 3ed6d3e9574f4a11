// src/error.rs
// =============================================================================
// Error types for the library side of the tool.
//
// Most failures while auditing are NOT errors: a page that won't load or a
// link that times out is recorded in the report and the crawl moves on.
// What's left here are the conditions that stop an operation outright.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Invalid starting URL or base domain could not be extracted: {0}")]
    InvalidSeed(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
