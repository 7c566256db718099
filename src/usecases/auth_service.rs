//! Login flow. Credential submission through AuthPort, rate-limited by the login guard.
//!
//! The "is authenticated" flag lives in the StatePort so other views can gate on it.

use crate::domain::{DomainError, FailureOutcome, GuardStatus, Session, SignInOutcome};
use crate::ports::{AuthPort, StatePort};
use crate::usecases::guard_service::{AttemptGuardService, blocked_message, describe_failure};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const AUTH_FLAG_KEY: &str = "is_authenticated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(Session),
    InvalidCredentials { attempts_left: u32 },
    /// This failure triggered the lockout.
    LockedOut { remaining_secs: u64 },
    /// Guard was locked before the attempt; credentials were not sent.
    Blocked { remaining_secs: u64 },
}

pub struct AuthService {
    auth: Arc<dyn AuthPort>,
    guard: Arc<AttemptGuardService>,
    state: Arc<dyn StatePort>,
}

impl AuthService {
    pub fn new(
        auth: Arc<dyn AuthPort>,
        guard: Arc<AttemptGuardService>,
        state: Arc<dyn StatePort>,
    ) -> Self {
        Self { auth, guard, state }
    }

    pub fn guard(&self) -> &Arc<AttemptGuardService> {
        &self.guard
    }

    /// Entering the login screen drops any previous session.
    pub async fn reset_session(&self) -> Result<(), DomainError> {
        self.state.remove(AUTH_FLAG_KEY).await?;
        if let Err(e) = self.auth.sign_out().await {
            warn!(error = %e, "sign out on login screen failed");
        }
        Ok(())
    }

    /// Check if we are already authenticated.
    pub async fn is_authenticated(&self) -> Result<bool, DomainError> {
        Ok(self.state.get(AUTH_FLAG_KEY).await?.as_deref() == Some("true"))
    }

    /// Submit credentials. Transport failures propagate as `Err` and do not count
    /// against the guard.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        if let GuardStatus::Locked { remaining_secs } = self.guard.refresh().await? {
            return Ok(LoginOutcome::Blocked { remaining_secs });
        }

        let outcome = self
            .auth
            .sign_in_with_password(email, password)
            .await
            .inspect_err(|e| error!(error = %e, "sign in request failed"))?;

        match outcome {
            SignInOutcome::Authenticated(session) => {
                self.guard.record_success().await?;
                self.state.set(AUTH_FLAG_KEY, "true").await?;
                info!(user = session.user_email.as_deref().unwrap_or("-"), "signed in");
                Ok(LoginOutcome::Authenticated(session))
            }
            SignInOutcome::InvalidCredentials => {
                Ok(match self.guard.record_failure().await? {
                    FailureOutcome::Retry { attempts_left } => {
                        LoginOutcome::InvalidCredentials { attempts_left }
                    }
                    FailureOutcome::LockedOut { remaining_secs } => {
                        LoginOutcome::LockedOut { remaining_secs }
                    }
                    FailureOutcome::Rejected { remaining_secs } => {
                        LoginOutcome::Blocked { remaining_secs }
                    }
                })
            }
        }
    }

    pub async fn logout(&self) -> Result<(), DomainError> {
        if let Err(e) = self.auth.sign_out().await {
            warn!(error = %e, "sign out failed; clearing local session anyway");
        }
        self.state.remove(AUTH_FLAG_KEY).await?;
        info!("signed out");
        Ok(())
    }

    pub fn describe(&self, outcome: &LoginOutcome) -> String {
        let policy = self.guard.policy();
        match *outcome {
            LoginOutcome::Authenticated(_) => "Signed in.".to_string(),
            LoginOutcome::InvalidCredentials { attempts_left } => describe_failure(
                "Invalid credentials",
                FailureOutcome::Retry { attempts_left },
                &policy,
            ),
            LoginOutcome::LockedOut { remaining_secs } => describe_failure(
                "Invalid credentials",
                FailureOutcome::LockedOut { remaining_secs },
                &policy,
            ),
            LoginOutcome::Blocked { remaining_secs } => blocked_message(remaining_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::guard_service::test_support::{ManualClock, MemoryState};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeAuth {
        password: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl AuthPort for FakeAuth {
        async fn sign_in_with_password(
            &self,
            email: &str,
            password: &str,
        ) -> Result<SignInOutcome, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if password == self.password {
                Ok(SignInOutcome::Authenticated(Session {
                    access_token: "tok".into(),
                    user_email: Some(email.to_string()),
                }))
            } else {
                Ok(SignInOutcome::InvalidCredentials)
            }
        }

        async fn sign_out(&self) -> Result<(), DomainError> {
            Ok(())
        }
    }

    fn service() -> (Arc<FakeAuth>, Arc<MemoryState>, Arc<ManualClock>, AuthService) {
        let auth = Arc::new(FakeAuth {
            password: "secret",
            calls: AtomicUsize::new(0),
        });
        let state = Arc::new(MemoryState::default());
        let clock = Arc::new(ManualClock::new());
        let guard = Arc::new(AttemptGuardService::login(state.clone(), clock.clone()));
        let svc = AuthService::new(auth.clone(), guard, state.clone());
        (auth, state, clock, svc)
    }

    #[tokio::test]
    async fn test_successful_login_sets_flag() {
        let (_auth, _state, _clock, svc) = service();
        let outcome = svc.login("admin@clinic.mx", "secret").await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Authenticated(_)));
        assert!(svc.is_authenticated().await.unwrap());

        svc.logout().await.unwrap();
        assert!(!svc.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_lockout_blocks_without_calling_auth() {
        let (auth, _state, clock, svc) = service();
        assert_eq!(
            svc.login("a@b.co", "x").await.unwrap(),
            LoginOutcome::InvalidCredentials { attempts_left: 2 }
        );
        svc.login("a@b.co", "x").await.unwrap();
        let locked = svc.login("a@b.co", "x").await.unwrap();
        assert_eq!(
            locked,
            LoginOutcome::LockedOut {
                remaining_secs: 3600
            }
        );
        assert_eq!(
            svc.describe(&locked),
            "Too many failed attempts. Access blocked for 1 hour."
        );

        clock.advance(1);
        let blocked = svc.login("a@b.co", "secret").await.unwrap();
        assert_eq!(
            blocked,
            LoginOutcome::Blocked {
                remaining_secs: 3599
            }
        );
        assert_eq!(svc.describe(&blocked), "Access blocked. Try again in 59:59.");
        assert_eq!(auth.calls.load(Ordering::SeqCst), 3);

        clock.advance(3599);
        assert!(matches!(
            svc.login("a@b.co", "secret").await.unwrap(),
            LoginOutcome::Authenticated(_)
        ));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_no_session() {
        let (_auth, _state, _clock, svc) = service();
        svc.login("a@b.co", "wrong").await.unwrap();
        assert!(!svc.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_session_clears_flag() {
        let (_auth, state, _clock, svc) = service();
        state.set(AUTH_FLAG_KEY, "true").await.unwrap();
        svc.reset_session().await.unwrap();
        assert!(!svc.is_authenticated().await.unwrap());
    }
}
