//! HTTP bindings to the Taroudant platform backend.
//!
//! [`ApiClient`] implements the API traits the domain and session layers
//! are written against: [`CatalogApi`], [`ReservationApi`], [`ReviewApi`],
//! [`ReportApi`], [`DirectoryApi`], [`AuthApi`] and [`ProfileApi`]. It
//! holds a shared [`SessionStore`] and
//! stamps the current bearer token on every authenticated request, so a
//! sign-in done anywhere in the client is immediately used everywhere.
//!
//! Backend verdicts arrive as HTTP statuses and are mapped onto the
//! domain error taxonomy in [`http`]; the reducers never see a status
//! code.
//!
//! [`CatalogApi`]: taroudant_domain::api::CatalogApi
//! [`ReservationApi`]: taroudant_domain::api::ReservationApi
//! [`ReviewApi`]: taroudant_domain::api::ReviewApi
//! [`ReportApi`]: taroudant_domain::api::ReportApi
//! [`DirectoryApi`]: taroudant_domain::api::DirectoryApi
//! [`AuthApi`]: taroudant_session::AuthApi
//! [`ProfileApi`]: taroudant_session::ProfileApi
//! [`SessionStore`]: taroudant_session::SessionStore

pub mod auth;
pub mod catalog;
pub mod config;
pub mod directory;
pub mod http;
pub mod reports;
pub mod reservations;
pub mod reviews;

pub use config::ClientConfig;

use taroudant_session::SessionStore;

/// The HTTP client for the platform backend.
///
/// Cheap to clone; all clones share the connection pool and the session
/// handle.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client from configuration and a session handle.
    #[must_use]
    pub fn new(config: &ClientConfig, session: SessionStore) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            // Builder failure means a broken TLS backend; the default
            // client would hit the same wall on first use.
            .unwrap_or_default();
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            session,
        }
    }

    /// The session handle this client stamps tokens from.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Request builder with the current bearer token, if signed in.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.current() {
            Some(session) => builder.bearer_auth(session.token),
            None => builder,
        }
    }
}
