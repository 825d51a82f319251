// src/error.rs

//! Unified error handling for the scraper application.

use std::fmt;

use thiserror::Error;

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The edge platform answered instead of the source site
    #[error("Upstream blocked with status {status} (server: {server})")]
    UpstreamBlocked { status: u16, server: String },

    /// The source site answered with a non-success status
    #[error("Upstream returned status {0}")]
    Upstream(u16),

    /// A scraped value could not be turned into a date
    #[error("Invalid date '{0}'")]
    Date(String),

    /// Key-value store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Nothing usable could be scraped
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a store error.
    pub fn store(message: impl fmt::Display) -> Self {
        Self::Store(message.to_string())
    }

    /// HTTP status code used when this error reaches the API surface.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }

    /// Message rendered in the JSON error body.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::NotFound(_) => "Not found.".to_string(),
            _ => "Internal error.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::validation("Missing id.").status_code(), 400);
        assert_eq!(AppError::not_found("group").status_code(), 404);
        assert_eq!(AppError::store("down").status_code(), 500);
    }

    #[test]
    fn test_public_message_hides_details() {
        assert_eq!(AppError::not_found("selector h1").public_message(), "Not found.");
        assert_eq!(AppError::Upstream(502).public_message(), "Internal error.");
        assert_eq!(AppError::validation("Missing id.").public_message(), "Missing id.");
    }
}
