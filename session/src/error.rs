//! Error types for session and authentication operations.

use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Everything that can go wrong while establishing or keeping a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Email or password rejected by the backend.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Guide account registered but not yet approved by an admin.
    #[error("account awaiting admin approval")]
    AccountPending,

    /// Account suspended by an admin.
    #[error("account suspended")]
    AccountSuspended,

    /// A registration field failed validation.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Which field or constraint was violated.
        reason: String,
    },

    /// Reading or writing the persisted session failed.
    #[error("session storage error: {0}")]
    Storage(String),

    /// The backend could not be reached or answered unexpectedly.
    #[error("network error: {0}")]
    Network(String),
}

impl SessionError {
    /// Whether the failure is a verdict on the account rather than on
    /// the attempt. Account verdicts are worth showing verbatim; the
    /// rest get generic messaging.
    #[must_use]
    pub const fn is_account_verdict(&self) -> bool {
        matches!(self, Self::AccountPending | Self::AccountSuspended)
    }
}
