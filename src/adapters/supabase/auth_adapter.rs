//! GoTrue password sign-in. Implements AuthPort.

use super::client::{SupabaseClient, ensure_success};
use crate::domain::{DomainError, Session, SignInOutcome};
use crate::ports::AuthPort;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    user: Option<TokenUser>,
}

#[derive(Deserialize)]
struct TokenUser {
    #[serde(default)]
    email: Option<String>,
}

pub struct SupabaseAuthAdapter {
    client: Arc<SupabaseClient>,
}

impl SupabaseAuthAdapter {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AuthPort for SupabaseAuthAdapter {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, DomainError> {
        let url = self.client.auth_url("token?grant_type=password");
        let req = self
            .client
            .http()
            .post(&url)
            .json(&PasswordGrant { email, password });
        let res = self
            .client
            .authorize(req)
            .await
            .send()
            .await
            .map_err(|e| DomainError::Auth(format!("sign-in request failed: {}", e)))?;

        // GoTrue answers 400 `invalid_grant` for a wrong password; some deployments use 401.
        if matches!(res.status(), StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            warn!(status = %res.status(), "sign-in rejected");
            return Ok(SignInOutcome::InvalidCredentials);
        }
        let res = ensure_success(res, "sign-in", DomainError::Auth).await?;

        let body: TokenResponse = res
            .json()
            .await
            .map_err(|e| DomainError::Auth(format!("failed to parse token response: {}", e)))?;

        self.client
            .set_access_token(Some(body.access_token.clone()))
            .await;
        let user_email = body
            .user
            .and_then(|u| u.email)
            .or_else(|| Some(email.to_string()));
        info!(email = ?user_email, "signed in");

        Ok(SignInOutcome::Authenticated(Session {
            access_token: body.access_token,
            user_email,
        }))
    }

    async fn sign_out(&self) -> Result<(), DomainError> {
        if self.client.access_token().await.is_none() {
            return Ok(());
        }
        let url = self.client.auth_url("logout");
        let req = self.client.http().post(&url);
        let result = self.client.authorize(req).await.send().await;
        // The local token is dropped even when the server call fails.
        self.client.set_access_token(None).await;

        let res = result.map_err(|e| DomainError::Auth(format!("sign-out request failed: {}", e)))?;
        ensure_success(res, "sign-out", DomainError::Auth).await?;
        info!("signed out");
        Ok(())
    }
}
