//! Error taxonomy for every client operation.
//!
//! DESIGN
//! ======
//! One tagged enum covers the four failure classes so callers can match
//! exhaustively: local validation, HTTP application errors, connectivity
//! (no response at all) and malformed success bodies. Nothing is retried.

use serde_json::Value;

pub const CONNECTIVITY_MESSAGE: &str = "Cannot connect to server. Please check that the backend is running.";
pub const MALFORMED_MESSAGE: &str = "Invalid response from server";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Rejected locally before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String, body: Option<Value> },

    /// No response was received (DNS, refused connection, offline, timeout).
    #[error("{message}")]
    Connectivity { message: String, cause: String },

    /// A 2xx response whose body could not be understood.
    #[error("{message}")]
    Malformed { message: String, cause: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn connectivity(cause: impl ToString) -> Self {
        Self::Connectivity { message: CONNECTIVITY_MESSAGE.to_owned(), cause: cause.to_string() }
    }

    pub fn malformed(cause: impl ToString) -> Self {
        Self::Malformed { message: MALFORMED_MESSAGE.to_owned(), cause: cause.to_string() }
    }

    /// HTTP status for application errors, `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// User-facing message, identical to the `Display` rendering.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::Http { message, .. }
            | Self::Connectivity { message, .. }
            | Self::Malformed { message, .. } => message,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
