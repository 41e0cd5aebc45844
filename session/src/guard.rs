//! Role-based route guarding.
//!
//! Mirrors the navigation contract of the platform front-end: a surface
//! declares which roles may enter, the guard checks the current session
//! and either admits the actor or names the redirect. No session means
//! the login page; the wrong role means home.

use taroudant_domain::types::{Actor, Role};

use crate::state::Session;

/// Where a refused visitor is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// The login page. Used when there is no session at all.
    Login,
    /// The public home page. Used when the session's role is wrong.
    Home,
}

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Admitted; commands issued from this surface carry this actor.
    Allow(Actor),
    /// Refused; navigate away.
    Redirect(Destination),
}

/// A surface's entry requirement.
#[derive(Clone, Copy, Debug)]
pub struct AccessGuard {
    allowed: &'static [Role],
}

impl AccessGuard {
    /// Guard admitting only the given roles.
    #[must_use]
    pub const fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    /// Guard for admin-only surfaces.
    #[must_use]
    pub const fn admin_only() -> Self {
        Self::new(&[Role::Admin])
    }

    /// Guard for the guide dashboard.
    #[must_use]
    pub const fn guide_only() -> Self {
        Self::new(&[Role::Guide])
    }

    /// Guard for tourist surfaces (booking, reviews).
    #[must_use]
    pub const fn tourist_only() -> Self {
        Self::new(&[Role::Tourist])
    }

    /// Guard for any signed-in user.
    #[must_use]
    pub const fn any_signed_in() -> Self {
        Self::new(&[Role::Tourist, Role::Guide, Role::Admin])
    }

    /// Check a session against this guard.
    #[must_use]
    pub fn authorize(&self, session: Option<&Session>) -> Access {
        match session {
            None => Access::Redirect(Destination::Login),
            Some(session) if self.allowed.contains(&session.role) => {
                Access::Allow(session.actor())
            },
            Some(session) => {
                tracing::debug!(role = %session.role, "role refused at guard");
                Access::Redirect(Destination::Home)
            },
        }
    }
}
