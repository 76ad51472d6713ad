//! Error handling for the bus admin client

use std::fmt;
use thiserror::Error;

/// Unified error type for the bus admin client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Credential store I/O errors
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The API answered with a non-2xx status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server supplied message, or a generic one
        message: String,
    },

    /// The API answered 2xx but the envelope reported `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Client-side coercion or precondition failures
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Credential store errors other than I/O
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The owning view was torn down before the request finished
    #[error("Request cancelled")]
    Cancelled,
}

impl Error {
    /// Create a new API error
    pub fn api<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Api {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new rejection error
    pub fn rejected<T: fmt::Display>(msg: T) -> Self {
        Error::Rejected(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new store error
    pub fn store<T: fmt::Display>(msg: T) -> Self {
        Error::Store(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Text shown to the operator when an action fails.
    ///
    /// Server supplied messages win; transport and decoding failures fall
    /// back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            Error::Rejected(message) | Error::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Whether the error only reports that the owning view went away
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_text() {
        let err = Error::api(400, "Email already registered");
        assert_eq!(err.user_message("Operation failed"), "Email already registered");

        let err = Error::rejected("Bus not found");
        assert_eq!(err.user_message("Operation failed"), "Bus not found");
    }

    #[test]
    fn user_message_falls_back_for_transport_errors() {
        let err = Error::store("lock poisoned");
        assert_eq!(err.user_message("Failed to delete user"), "Failed to delete user");
        assert_eq!(Error::Cancelled.user_message("x"), "x");
    }
}
