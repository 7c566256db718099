//! Shared HTTP client for the hosted backend (GoTrue auth + PostgREST).
//!
//! Holds the anon key and, after sign-in, the user's access token. The auth
//! adapter writes the token; the store adapter reads it for every request.

use crate::domain::DomainError;
use reqwest::{RequestBuilder, Response};
use tokio::sync::RwLock;
use tracing::warn;

pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    access_token: RwLock<Option<String>>,
}

impl SupabaseClient {
    /// `base_url` is the project URL, e.g. `https://abc.supabase.co`.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            access_token: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub(crate) fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Adds `apikey` and `Authorization: Bearer` (session token, or the anon key
    /// when signed out).
    pub(crate) async fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token()
            .await
            .unwrap_or_else(|| self.anon_key.clone());
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }
}

/// Turns a non-2xx response into an error built by `make`, keeping the first
/// 200 characters of the body.
pub(crate) async fn ensure_success(
    res: Response,
    what: &str,
    make: fn(String) -> DomainError,
) -> Result<Response, DomainError> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    warn!(status = %status, body = %text, "{} failed", what);
    Err(make(format!(
        "{} returned {}: {}",
        what,
        status,
        text.chars().take(200).collect::<String>()
    )))
}
