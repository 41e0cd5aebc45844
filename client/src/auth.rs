//! Auth endpoints under `/auth`.
//!
//! The backend answers a credential check with 200 and a possibly
//! token-less body (pending guide), or 401/403 whose body distinguishes
//! a plain rejection from a suspended account.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use taroudant_session::{
    AuthApi, LoginReply, ProfileApi, ProfileUpdate, Registration, SessionError,
};
use taroudant_domain::types::Identity;

use crate::ApiClient;

/// The backend marks suspended accounts with one of these markers in
/// the refusal body.
const SUSPENSION_MARKERS: [&str; 2] = ["suspendu", "locked"];

fn session_error(status: reqwest::StatusCode, body: &str) -> SessionError {
    let lowered = body.to_lowercase();
    if SUSPENSION_MARKERS.iter().any(|m| lowered.contains(m)) {
        return SessionError::AccountSuspended;
    }
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            SessionError::InvalidCredentials
        },
        reqwest::StatusCode::BAD_REQUEST => SessionError::InvalidInput {
            reason: if body.is_empty() {
                "request rejected".to_owned()
            } else {
                body.to_owned()
            },
        },
        other => SessionError::Network(format!("unexpected status {other}")),
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(
        &self,
        email: String,
        password: String,
    ) -> Result<LoginReply, SessionError> {
        let response = self
            .request(Method::POST, "/auth/login")
            .json(&json!({"email": email, "password": password}))
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(session_error(status, &body));
        }
        response
            .json()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))
    }

    async fn register(&self, registration: Registration) -> Result<LoginReply, SessionError> {
        let response = self
            .request(Method::POST, "/auth/register")
            .json(&registration)
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(session_error(status, &body));
        }
        response
            .json()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))
    }
}

#[async_trait]
impl ProfileApi for ApiClient {
    async fn me(&self) -> Result<Identity, SessionError> {
        let response = self
            .request(Method::GET, "/auth/me")
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(session_error(status, &body));
        }
        response
            .json()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))
    }

    async fn update_profile(&self, update: ProfileUpdate) -> Result<Identity, SessionError> {
        let response = self
            .request(Method::PUT, "/auth/profile")
            .json(&update)
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(session_error(status, &body));
        }
        response
            .json()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))
    }
}
