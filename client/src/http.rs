//! Shared request plumbing and HTTP status mapping.
//!
//! Backend verdicts are carried as statuses: 401 for rejected
//! credentials, 403 for a role or ownership refusal, 404 for a missing
//! or invisible entity, 409 for an undefined transition, 400 for field
//! validation. Everything else that isn't a success is a transport-level
//! failure.

use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use taroudant_domain::error::{LifecycleError, Result};

use crate::ApiClient;

/// Map a non-success response onto the lifecycle taxonomy.
pub(crate) async fn verdict(response: Response) -> LifecycleError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(%status, "backend refused request");
    match status {
        StatusCode::UNAUTHORIZED => LifecycleError::CredentialRejected,
        StatusCode::FORBIDDEN => LifecycleError::PermissionDenied,
        StatusCode::NOT_FOUND => LifecycleError::NotFound,
        StatusCode::CONFLICT => LifecycleError::InvalidTransition,
        StatusCode::BAD_REQUEST => LifecycleError::InvalidInput {
            reason: if body.is_empty() {
                "request rejected".to_owned()
            } else {
                body
            },
        },
        other => LifecycleError::Network(format!("unexpected status {other}")),
    }
}

pub(crate) fn transport(e: reqwest::Error) -> LifecycleError {
    LifecycleError::Network(e.to_string())
}

impl ApiClient {
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(verdict(response).await);
        }
        response.json().await.map_err(transport)
    }

    pub(crate) async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(verdict(response).await);
        }
        response.json().await.map_err(transport)
    }

    pub(crate) async fn put_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .request(Method::PUT, path)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(verdict(response).await);
        }
        response.json().await.map_err(transport)
    }

    /// PUT with no body, for status-move endpoints. Returns the updated
    /// resource.
    pub(crate) async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .request(Method::PUT, path)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(verdict(response).await);
        }
        response.json().await.map_err(transport)
    }

    /// DELETE, tolerating an empty 200/204 reply.
    pub(crate) async fn delete_path(&self, path: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, path)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(verdict(response).await);
        }
        Ok(())
    }
}
