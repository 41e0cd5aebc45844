//! Session layer for the Taroudant platform client.
//!
//! Owns everything between "the user typed a password" and "a command
//! carries an [`Actor`]":
//!
//! - [`state`]: the [`Session`] record and the authentication phase machine
//! - [`error`]: the session error taxonomy
//! - [`api`]: the trait the remote auth endpoints are reached through
//! - [`storage`]: pluggable session persistence (file-backed or in-memory)
//! - [`store`]: the shared, observable session handle
//! - [`guard`]: role-based route guarding
//! - [`reducer`]: the login/register/logout reducer
//!
//! [`Actor`]: taroudant_domain::Actor

pub mod api;
pub mod error;
pub mod guard;
pub mod reducer;
pub mod state;
pub mod storage;
pub mod store;

pub use api::{
    AuthApi, LoginReply, ProfileApi, ProfileUpdate, Registration, SharedAuthApi,
    SharedProfileApi,
};
pub use error::{Result, SessionError};
pub use guard::{Access, AccessGuard, Destination};
pub use reducer::{SessionAction, SessionEnvironment, SessionReducer};
pub use state::{Session, SessionPhase, SessionState};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStorage};
pub use store::SessionStore;
