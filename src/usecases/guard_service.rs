//! Persisted attempt guard. Wraps the pure state machine with a StatePort and a Clock.
//!
//! - State is read once at startup via `load()`
//! - Every transition is written back (attempt count + deadline in epoch ms)
//! - An expired lockout found on load is cleared immediately

use crate::domain::{
    AttemptGuardState, DomainError, FailureOutcome, GuardPolicy, GuardStatus, format_remaining,
};
use crate::ports::{Clock, StatePort};
use chrono::DateTime;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// State keys for one guard instance.
#[derive(Debug, Clone, Copy)]
pub struct GuardKeys {
    pub attempts: &'static str,
    pub blocked_until: &'static str,
}

pub const LOGIN_KEYS: GuardKeys = GuardKeys {
    attempts: "login_attempts",
    blocked_until: "login_blocked_until",
};

pub const PIN_KEYS: GuardKeys = GuardKeys {
    attempts: "pin_attempts",
    blocked_until: "pin_blocked_until",
};

pub struct AttemptGuardService {
    name: &'static str,
    policy: GuardPolicy,
    keys: GuardKeys,
    state: Arc<dyn StatePort>,
    clock: Arc<dyn Clock>,
    inner: Mutex<AttemptGuardState>,
}

impl AttemptGuardService {
    pub fn new(
        name: &'static str,
        policy: GuardPolicy,
        keys: GuardKeys,
        state: Arc<dyn StatePort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name,
            policy,
            keys,
            state,
            clock,
            inner: Mutex::new(AttemptGuardState::default()),
        }
    }

    pub fn login(state: Arc<dyn StatePort>, clock: Arc<dyn Clock>) -> Self {
        Self::new("login", GuardPolicy::LOGIN, LOGIN_KEYS, state, clock)
    }

    pub fn action_pin(state: Arc<dyn StatePort>, clock: Arc<dyn Clock>) -> Self {
        Self::new("action_pin", GuardPolicy::ACTION_PIN, PIN_KEYS, state, clock)
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    /// Restore counters and deadline from the state port.
    pub async fn load(&self) -> Result<GuardStatus, DomainError> {
        let attempts = self.state.get(self.keys.attempts).await?;
        let blocked = self.state.get(self.keys.blocked_until).await?;

        let attempt_count = attempts
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(0);
        let blocked_until = match blocked.as_deref() {
            Some(raw) => {
                let parsed = raw
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(DateTime::from_timestamp_millis);
                if parsed.is_none() {
                    warn!(guard = self.name, value = raw, "ignoring unreadable lockout deadline");
                }
                parsed
            }
            None => None,
        };

        let mut guard = self.inner.lock().await;
        *guard = AttemptGuardState {
            attempt_count: attempt_count.min(self.policy.max_attempts.saturating_sub(1)),
            blocked_until,
        };
        let now = self.clock.now();
        if guard.refresh(now) {
            info!(guard = self.name, "stored lockout has expired; cleared");
        }
        self.persist(&guard).await?;
        Ok(guard.status(&self.policy, now))
    }

    /// Current status. Performs the Locked → Open transition when due.
    pub async fn refresh(&self) -> Result<GuardStatus, DomainError> {
        let mut guard = self.inner.lock().await;
        let now = self.clock.now();
        if guard.refresh(now) {
            info!(guard = self.name, "lockout expired; attempts allowed again");
            self.persist(&guard).await?;
        }
        Ok(guard.status(&self.policy, now))
    }

    pub async fn record_failure(&self) -> Result<FailureOutcome, DomainError> {
        let mut guard = self.inner.lock().await;
        let now = self.clock.now();
        let before = *guard;
        let outcome = guard.record_failure(&self.policy, now);
        match outcome {
            FailureOutcome::Retry { attempts_left } => {
                info!(guard = self.name, attempts_left, "failed attempt recorded");
            }
            FailureOutcome::LockedOut { remaining_secs } => {
                warn!(guard = self.name, remaining_secs, "too many failed attempts; locked");
            }
            FailureOutcome::Rejected { .. } => {}
        }
        if *guard != before {
            self.persist(&guard).await?;
        }
        Ok(outcome)
    }

    pub async fn record_success(&self) -> Result<(), DomainError> {
        let mut guard = self.inner.lock().await;
        guard.record_success();
        self.persist(&guard).await
    }

    /// Snapshot of the in-memory state.
    pub async fn snapshot(&self) -> AttemptGuardState {
        *self.inner.lock().await
    }

    async fn persist(&self, guard: &AttemptGuardState) -> Result<(), DomainError> {
        if guard.attempt_count == 0 {
            self.state.remove(self.keys.attempts).await?;
        } else {
            self.state
                .set(self.keys.attempts, &guard.attempt_count.to_string())
                .await?;
        }
        match guard.blocked_until {
            Some(until) => {
                self.state
                    .set(
                        self.keys.blocked_until,
                        &until.timestamp_millis().to_string(),
                    )
                    .await
            }
            None => self.state.remove(self.keys.blocked_until).await,
        }
    }
}

/// "1 hour", "15 minutes", "30 seconds".
pub fn describe_duration(secs: i64) -> String {
    fn plural(n: i64, unit: &str) -> String {
        if n == 1 {
            format!("1 {}", unit)
        } else {
            format!("{} {}s", n, unit)
        }
    }
    if secs >= 3600 && secs % 3600 == 0 {
        plural(secs / 3600, "hour")
    } else if secs >= 60 && secs % 60 == 0 {
        plural(secs / 60, "minute")
    } else {
        plural(secs, "second")
    }
}

/// Operator-facing text for a failed attempt. `subject` names what was wrong
/// ("Invalid credentials", "Incorrect PIN").
pub fn describe_failure(subject: &str, outcome: FailureOutcome, policy: &GuardPolicy) -> String {
    match outcome {
        FailureOutcome::Retry { attempts_left } => format!(
            "{}. {} attempt{} left.",
            subject,
            attempts_left,
            if attempts_left == 1 { "" } else { "s" }
        ),
        FailureOutcome::LockedOut { .. } => format!(
            "Too many failed attempts. Access blocked for {}.",
            describe_duration(policy.lockout_secs)
        ),
        FailureOutcome::Rejected { remaining_secs } => blocked_message(remaining_secs),
    }
}

pub fn blocked_message(remaining_secs: u64) -> String {
    format!(
        "Access blocked. Try again in {}.",
        format_remaining(remaining_secs)
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    pub struct MemoryState {
        pub values: StdMutex<HashMap<String, String>>,
    }

    #[async_trait::async_trait]
    impl StatePort for MemoryState {
        async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), DomainError> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    pub struct ManualClock {
        now: StdMutex<chrono::DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                now: StdMutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            }
        }

        pub fn advance(&self, secs: i64) {
            *self.now.lock().unwrap() += Duration::seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> chrono::DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }
}
