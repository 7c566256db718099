//! Configuration-backed sign-in, used when the hosted backend is not configured.
//!
//! Checks the submitted pair against `local_admin_email` / `local_admin_password`.
//! With no credentials configured every attempt is rejected.

use crate::domain::{DomainError, Session, SignInOutcome};
use crate::ports::AuthPort;
use tracing::{debug, info};

pub struct LocalAuthAdapter {
    credentials: Option<(String, String)>,
}

impl LocalAuthAdapter {
    pub fn new(email: Option<String>, password: Option<String>) -> Self {
        let credentials = match (email, password) {
            (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => {
                Some((e.trim().to_lowercase(), p))
            }
            _ => None,
        };
        Self { credentials }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait::async_trait]
impl AuthPort for LocalAuthAdapter {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, DomainError> {
        let Some((admin_email, admin_password)) = &self.credentials else {
            debug!("local sign-in attempted without configured credentials");
            return Ok(SignInOutcome::InvalidCredentials);
        };
        let email = email.trim().to_lowercase();
        if email == *admin_email && password == admin_password {
            info!(email = %email, "local sign-in");
            Ok(SignInOutcome::Authenticated(Session {
                access_token: format!("local-{}", uuid::Uuid::new_v4()),
                user_email: Some(email),
            }))
        } else {
            Ok(SignInOutcome::InvalidCredentials)
        }
    }

    async fn sign_out(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_sign_in_matches_configured_pair() {
        let auth = LocalAuthAdapter::new(
            Some("Admin@Clinic.mx".to_string()),
            Some("s3cret".to_string()),
        );
        assert!(auth.is_configured());

        let ok = auth
            .sign_in_with_password(" admin@clinic.mx ", "s3cret")
            .await
            .unwrap();
        match ok {
            SignInOutcome::Authenticated(s) => {
                assert_eq!(s.user_email.as_deref(), Some("admin@clinic.mx"));
                assert!(s.access_token.starts_with("local-"));
            }
            other => panic!("expected session, got {:?}", other),
        }

        let bad = auth
            .sign_in_with_password("admin@clinic.mx", "S3CRET")
            .await
            .unwrap();
        assert_eq!(bad, SignInOutcome::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_unconfigured_rejects_everything() {
        let auth = LocalAuthAdapter::new(Some("admin@clinic.mx".to_string()), None);
        assert!(!auth.is_configured());
        let out = auth.sign_in_with_password("admin@clinic.mx", "").await.unwrap();
        assert_eq!(out, SignInOutcome::InvalidCredentials);
    }
}
