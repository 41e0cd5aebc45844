//! The login/register/logout reducer.
//!
//! Credentials go out, a session comes back, and only backend-confirmed
//! events touch state. A reply without a token is the backend's way of
//! saying a guide account is still awaiting approval; the reducer turns
//! it into [`SessionError::AccountPending`] instead of a session.

use std::sync::Arc;

use taroudant_core::{
    effect::{Effect, Effects},
    environment::Clock,
    reducer::Reducer,
    smallvec,
};
use taroudant_domain::types::Role;

use crate::api::{Registration, SharedAuthApi};
use crate::error::SessionError;
use crate::state::{Session, SessionPhase, SessionState};
use crate::store::SessionStore;

/// Actions for the session reducer.
#[derive(Clone, Debug)]
pub enum SessionAction {
    // Commands
    /// Sign in with email and password.
    Login {
        /// Login email.
        email: String,
        /// Password.
        password: String,
    },

    /// Create an account.
    Register {
        /// The registration fields.
        registration: Registration,
    },

    /// Sign out.
    Logout,

    /// Resume the session persisted by a previous run or another handle.
    Restore,

    // Events
    /// The backend accepted the credentials and issued a token.
    LoggedIn {
        /// The established session.
        session: Session,
    },

    /// The backend created the account but issued no credential yet
    /// (a guide awaiting admin approval).
    Registered {
        /// The role the backend recorded.
        role: Role,
    },

    /// The session ended.
    LoggedOut,

    /// The persisted session was read back.
    Restored {
        /// Whatever storage held, possibly nothing.
        session: Option<Session>,
    },

    /// A login or registration attempt failed.
    AuthFailed {
        /// Why.
        error: SessionError,
    },
}

/// Environment dependencies for the session reducer.
#[derive(Clone)]
pub struct SessionEnvironment {
    /// The remote auth endpoints.
    pub api: SharedAuthApi,
    /// The shared session handle, persisted through and observed by the
    /// rest of the client.
    pub store: SessionStore,
    /// Clock stamping `issued_at`.
    pub clock: Arc<dyn Clock>,
}

impl SessionEnvironment {
    /// Creates a new `SessionEnvironment`.
    #[must_use]
    pub fn new(api: SharedAuthApi, store: SessionStore, clock: Arc<dyn Clock>) -> Self {
        Self { api, store, clock }
    }
}

/// Reducer for the authentication flow.
#[derive(Clone, Debug, Default)]
pub struct SessionReducer;

impl SessionReducer {
    /// Creates a new `SessionReducer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_login(email: &str, password: &str) -> Result<(), SessionError> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(SessionError::InvalidInput {
                reason: "a valid email is required".to_owned(),
            });
        }
        if password.is_empty() {
            return Err(SessionError::InvalidInput {
                reason: "password is required".to_owned(),
            });
        }
        Ok(())
    }

    fn validate_registration(registration: &Registration) -> Result<(), SessionError> {
        if registration.full_name.trim().is_empty() {
            return Err(SessionError::InvalidInput {
                reason: "full name is required".to_owned(),
            });
        }
        Self::validate_login(&registration.email, &registration.password)?;
        if registration.role == Role::Admin {
            return Err(SessionError::InvalidInput {
                reason: "admin accounts cannot be self-registered".to_owned(),
            });
        }
        Ok(())
    }

    fn reject(state: &mut SessionState, error: SessionError) -> Effects<SessionAction> {
        tracing::warn!(%error, "auth command refused");
        state.phase = SessionPhase::Failed(error);
        Effects::new()
    }
}

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            // ========== Login ==========
            SessionAction::Login { email, password } => {
                if let Err(error) = Self::validate_login(&email, &password) {
                    return Self::reject(state, error);
                }
                state.phase = SessionPhase::Authenticating;

                let api = Arc::clone(&env.api);
                let clock = Arc::clone(&env.clock);
                smallvec![Effect::future(async move {
                    Some(match api.login(email, password).await {
                        Ok(reply) => match reply.token {
                            Some(token) => SessionAction::LoggedIn {
                                session: Session {
                                    token,
                                    user_id: reply.user_id,
                                    role: reply.role,
                                    full_name: reply.full_name,
                                    issued_at: clock.now(),
                                },
                            },
                            // No token on a successful reply: the account
                            // exists but is not yet approved
                            None => SessionAction::AuthFailed {
                                error: SessionError::AccountPending,
                            },
                        },
                        Err(error) => SessionAction::AuthFailed { error },
                    })
                })]
            },

            // ========== Register ==========
            SessionAction::Register { registration } => {
                if let Err(error) = Self::validate_registration(&registration) {
                    return Self::reject(state, error);
                }
                state.phase = SessionPhase::Authenticating;

                let api = Arc::clone(&env.api);
                let clock = Arc::clone(&env.clock);
                smallvec![Effect::future(async move {
                    Some(match api.register(registration).await {
                        // A token on the reply means the account is live;
                        // sign the new tourist straight in
                        Ok(reply) => match reply.token {
                            Some(token) => SessionAction::LoggedIn {
                                session: Session {
                                    token,
                                    user_id: reply.user_id,
                                    role: reply.role,
                                    full_name: reply.full_name,
                                    issued_at: clock.now(),
                                },
                            },
                            None => SessionAction::Registered { role: reply.role },
                        },
                        Err(error) => SessionAction::AuthFailed { error },
                    })
                })]
            },

            // ========== Logout ==========
            SessionAction::Logout => {
                state.phase = SessionPhase::SignedOut;
                let store = env.store.clone();
                smallvec![Effect::future(async move {
                    if let Err(error) = store.clear().await {
                        tracing::warn!(%error, "failed to clear persisted session");
                    }
                    None
                })]
            },

            // ========== Restore ==========
            SessionAction::Restore => {
                let store = env.store.clone();
                smallvec![Effect::future(async move {
                    match store.reload().await {
                        Ok(session) => Some(SessionAction::Restored { session }),
                        Err(error) => {
                            tracing::warn!(%error, "failed to restore session");
                            Some(SessionAction::Restored { session: None })
                        },
                    }
                })]
            },

            // ========== Events ==========
            SessionAction::LoggedIn { session } => {
                tracing::info!(user = %session.user_id, role = %session.role, "signed in");
                state.phase = SessionPhase::Authenticated(session.clone());
                state.registration_pending = false;

                let store = env.store.clone();
                smallvec![Effect::future(async move {
                    if let Err(error) = store.persist(session).await {
                        tracing::warn!(%error, "failed to persist session");
                    }
                    None
                })]
            },

            SessionAction::Registered { role } => {
                state.phase = SessionPhase::SignedOut;
                // Guides wait for an admin; tourists can sign straight in
                state.registration_pending = role == Role::Guide;
                Effects::new()
            },

            SessionAction::LoggedOut => {
                state.phase = SessionPhase::SignedOut;
                Effects::new()
            },

            SessionAction::Restored { session } => {
                state.phase = match session {
                    Some(session) => SessionPhase::Authenticated(session),
                    None => SessionPhase::SignedOut,
                };
                Effects::new()
            },

            SessionAction::AuthFailed { error } => {
                tracing::warn!(%error, "authentication failed");
                state.phase = SessionPhase::Failed(error);
                Effects::new()
            },
        }
    }
}
