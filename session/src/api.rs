//! The trait the remote auth endpoints are reached through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use taroudant_domain::types::{Identity, Role, UserId};

use crate::error::Result;

/// What the backend answers to a successful credential check.
///
/// The token is absent for a guide whose account is still awaiting
/// admin approval; the reducer turns that into
/// [`SessionError::AccountPending`](crate::error::SessionError::AccountPending).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginReply {
    /// Bearer token, absent for pending guide accounts.
    #[serde(default)]
    pub token: Option<String>,
    /// The authenticated user's id.
    pub user_id: UserId,
    /// The authenticated user's role.
    pub role: Role,
    /// Display name.
    pub full_name: String,
}

/// Fields submitted at registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Display name.
    pub full_name: String,
    /// Login email.
    pub email: String,
    /// Password, sent once over TLS.
    pub password: String,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Requested role. Guide registrations start PENDING.
    pub role: Role,
    /// Guide biography, guide registrations only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Spoken languages, guide registrations only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
}

/// Remote authentication operations.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a [`LoginReply`].
    async fn login(&self, email: String, password: String) -> Result<LoginReply>;

    /// Create an account. The reply mirrors login: an active tourist is
    /// issued a token and can be signed straight in, a guide gets none
    /// until an admin approves the account.
    async fn register(&self, registration: Registration) -> Result<LoginReply>;
}

/// Shared handle to an auth backend.
pub type SharedAuthApi = Arc<dyn AuthApi>;

/// Fields a signed-in user may change on their own profile. Absent
/// fields are left untouched by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// New contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New biography, guides only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New spoken languages, guides only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
}

/// Profile reads and edits for the signed-in user. Kept apart from
/// [`AuthApi`] so the login reducer only depends on credential exchange.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// The identity behind the current credential.
    async fn me(&self) -> Result<Identity>;

    /// Update the signed-in user's profile.
    async fn update_profile(&self, update: ProfileUpdate) -> Result<Identity>;
}

/// Shared handle to a profile backend.
pub type SharedProfileApi = Arc<dyn ProfileApi>;
