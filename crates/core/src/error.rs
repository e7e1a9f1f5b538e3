// Error types for the notification pipeline

use thiserror::Error;

/// Result type alias for notification pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing, storing or delivering notifications
#[derive(Debug, Error)]
pub enum Error {
    /// Lookup by id found no matching active record
    #[error("{0} not found")]
    NotFound(String),

    /// Notification or user store error
    #[error("Store error: {0}")]
    Store(String),

    /// Email transport error
    #[error("Email error: {0}")]
    Email(String),

    /// Real-time delivery error
    #[error("Realtime error: {0}")]
    Realtime(String),

    /// Token validation error
    #[error("Auth error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Event handler error
    #[error("Handler error: {0}")]
    Handler(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// Create a not-found error for a notification id
    pub fn notification_not_found(id: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("Notification with ID {}", id))
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }

    /// Create an email error
    pub fn email(msg: impl Into<String>) -> Self {
        Error::Email(msg.into())
    }

    /// Create a realtime error
    pub fn realtime(msg: impl Into<String>) -> Self {
        Error::Realtime(msg.into())
    }

    /// Create an auth error
    pub fn auth(msg: impl Into<String>) -> Self {
        Error::Auth(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Create a handler error
    pub fn handler(msg: impl Into<String>) -> Self {
        Error::Handler(msg.into())
    }

    /// Whether this error is a not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
