// src/error.rs

//! Unified error handling for the bot application.

use std::fmt;

use thiserror::Error;

/// Result type alias for bot operations.
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

    /// RSS feed parsing failed
    #[error("Feed parse error: {0}")]
    Feed(#[from] rss::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Image decoding/encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication with the publishing service failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// XRPC endpoint returned a non-success status
    #[error("API error from {endpoint} ({status}): {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// Publishing a single item failed
    #[error("Publish error for {context}: {message}")]
    Publish { context: String, message: String },

    /// Link-preview embed could not be built
    #[error("Embed error: {0}")]
    Embed(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an authentication error.
    pub fn auth(message: impl fmt::Display) -> Self {
        Self::Auth(message.to_string())
    }

    /// Create an API error for an XRPC endpoint.
    pub fn api(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a publish error with item context.
    pub fn publish(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Publish {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create an embed error.
    pub fn embed(message: impl fmt::Display) -> Self {
        Self::Embed(message.to_string())
    }
}
