//! Session state types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taroudant_domain::types::{Actor, Role, UserId};

use crate::error::SessionError;

/// An established session: the bearer credential plus the identity
/// summary every command is stamped with.
///
/// Persisted between runs so a restarted client resumes where it left
/// off; other handles on the same storage observe changes through
/// [`SessionStore`](crate::store::SessionStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent on every authenticated request.
    pub token: String,
    /// The signed-in user's id.
    pub user_id: UserId,
    /// The signed-in user's role.
    pub role: Role,
    /// Display name, for greeting headers.
    pub full_name: String,
    /// When the session was established.
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// The actor summary stamped on commands.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

/// Where the authentication flow currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No session, nothing in flight.
    #[default]
    SignedOut,
    /// A login or registration request is in flight.
    Authenticating,
    /// Signed in.
    Authenticated(Session),
    /// The last attempt failed.
    Failed(SessionError),
}

/// Root state for the session reducer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Current authentication phase.
    pub phase: SessionPhase,
    /// Set after a guide registers, until their first successful login.
    pub registration_pending: bool,
}

impl SessionState {
    /// Creates a signed-out state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session, if signed in.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match &self.phase {
            SessionPhase::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// The current actor, if signed in.
    #[must_use]
    pub const fn actor(&self) -> Option<Actor> {
        match self.session() {
            Some(session) => Some(session.actor()),
            None => None,
        }
    }
}
