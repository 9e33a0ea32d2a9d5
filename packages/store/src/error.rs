//! # Error taxonomy
//!
//! Three kinds of failure reach the user:
//!
//! | Type | Raised | Surfaced as |
//! |------|--------|-------------|
//! | [`ValidationError`] | locally, before any backend call | inline banner or alert |
//! | [`BackendError`] | by a [`crate::Backend`] call | the backend's message, verbatim |
//! | [`AppError::Unauthenticated`] | when an action needs a user id and none is resolved | alert |
//!
//! Nothing here is fatal: every flow returns to an idle, interactive state after reporting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum password length accepted before the backend is contacted.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Input rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("Valid email is required")]
    MissingEmail,
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    ShortPassword,
    #[error("Please fill in all fields")]
    EmptyNote,
}

/// Failure reported by the hosted backend (or by talking to it).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The service answered with a non-success status and a readable message.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),
    /// The response could not be decoded.
    #[error("unexpected response from backend: {0}")]
    Decode(String),
    /// The access token is missing, expired or unknown.
    #[error("Auth session missing!")]
    Unauthenticated,
}

impl BackendError {
    /// The human-readable message shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status attached to the failure, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthenticated => Some(401),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

/// Any failure a flow can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("You must be logged in to add a note")]
    Unauthenticated,
}

impl AppError {
    /// Message to show the user, falling back to `fallback` when the backend sent none.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}
