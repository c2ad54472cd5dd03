//! Error types for Leadbook.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for Leadbook operations.
#[derive(Error, Debug)]
pub enum LeadbookError {
    /// Store operation errors (network failures, constraint violations, etc.)
    #[error("Store error: {0}")]
    Store(String),

    /// Authentication errors (invalid credentials, expired session, etc.)
    #[error("Auth error: {0}")]
    Auth(String),

    /// Input validation errors (missing required fields, bad values, etc.)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LeadbookError {
    /// Creates a store error with the given message.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Creates an auth error with the given message.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Store(_) => "Store Error",
            Self::Auth(_) => "Auth Error",
            Self::Validation(_) => "Validation Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using LeadbookError.
pub type Result<T> = std::result::Result<T, LeadbookError>;
