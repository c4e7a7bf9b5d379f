// src/error.rs

//! Unified error handling for the scholar watcher.

use thiserror::Error;

/// Result type alias for watcher operations.
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

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source served an automated-traffic interstitial instead of results
    #[error("Source blocked the request at offset {offset}: {message}")]
    Blocked { offset: u32, message: String },

    /// A results page could not be fetched or read
    #[error("Page fetch failed at offset {offset}: {message}")]
    Page { offset: u32, message: String },

    /// History file is not valid UTF-8
    #[error("History file is not valid UTF-8: {0}")]
    History(#[from] std::string::FromUtf8Error),

    /// Mail address is malformed
    #[error("Mail address error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Mail message could not be built
    #[error("Mail build error: {0}")]
    MailBuild(#[from] lettre::error::Error),

    /// SMTP transport failure
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a blocked-source error for the given page offset.
    pub fn blocked(offset: u32, message: impl Into<String>) -> Self {
        Self::Blocked {
            offset,
            message: message.into(),
        }
    }

    /// Create a page fetch error for the given page offset.
    pub fn page(offset: u32, message: impl std::fmt::Display) -> Self {
        Self::Page {
            offset,
            message: message.to_string(),
        }
    }
}
