//! Error types for the murmur client.

use thiserror::Error;

/// A shared error type for the murmur client.
///
/// The remote service collapses transport failures and non-2xx responses
/// into one generic backend error carrying only the operation that failed.
/// No status code or retry hint is preserved; callers decide between
/// fallback, surfacing the failure to the user, or swallowing it.
#[derive(Error, Debug, Clone)]
pub enum MurmurError {
    /// A remote API call failed (network error or non-2xx response)
    #[error("Failed to {operation}")]
    Backend { operation: &'static str },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MurmurError {
    /// Creates a Backend error for the named operation.
    pub fn backend(operation: &'static str) -> Self {
        Self::Backend { operation }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a Backend error
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }
}

/// Result type alias using [`MurmurError`].
pub type Result<T> = std::result::Result<T, MurmurError>;
