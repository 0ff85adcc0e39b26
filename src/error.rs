// src/error.rs

//! Unified error handling for the collector application.

use std::fmt;

use thiserror::Error;

/// Result type alias for collector operations.
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

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Collection error
    #[error("Collect error for {context}: {message}")]
    Collect { context: String, message: String },

    /// Report generation failed
    #[error("Digest error: {0}")]
    Digest(String),

    /// Push notification rejected or failed
    #[error("Push error: {0}")]
    Push(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a collection error with context.
    pub fn collect(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Collect {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a digest error.
    pub fn digest(message: impl Into<String>) -> Self {
        Self::Digest(message.into())
    }

    /// Create a push error.
    pub fn push(message: impl Into<String>) -> Self {
        Self::Push(message.into())
    }
}
