//! Lifecycle error taxonomy.
//!
//! One enum covers every way a command can fail, whether the rejection
//! happens locally before any request is built or comes back from the
//! backend as an HTTP status. Variants are cloneable and comparable so
//! reducers can store the last failure in state.

use thiserror::Error;

/// Result alias for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Everything that can go wrong with a lifecycle command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The actor's role or ownership does not allow this operation.
    #[error("permission denied")]
    PermissionDenied,

    /// The addressed entity does not exist (or is invisible to the actor).
    #[error("not found")]
    NotFound,

    /// The booking target exists but is not in a bookable state.
    #[error("target is not available for booking")]
    TargetUnavailable,

    /// The requested status change is not defined from the current status.
    #[error("invalid transition")]
    InvalidTransition,

    /// A submitted field failed validation.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Which field or constraint was violated.
        reason: String,
    },

    /// Authentication failed: bad credentials, pending or suspended account.
    #[error("credentials rejected")]
    CredentialRejected,

    /// The backend could not be reached or answered unexpectedly.
    #[error("network error: {0}")]
    Network(String),
}

impl LifecycleError {
    /// Whether retrying the same command unchanged could succeed.
    ///
    /// Only transport failures qualify; every other variant is a verdict
    /// on the command itself.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
