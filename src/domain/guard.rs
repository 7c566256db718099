//! Attempt guard: failed-attempt counter with a timed lockout.
//!
//! Two states. **Open** accepts attempts; **Locked** rejects them until
//! `blocked_until`. Time is always passed in, so transitions are deterministic.
//! The guard is a UX deterrent only; nothing server-side enforces it.

use chrono::{DateTime, Duration, Utc};

/// Parameters of one guard instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPolicy {
    pub max_attempts: u32,
    pub lockout_secs: i64,
}

impl GuardPolicy {
    /// Credential submission: 3 attempts, 1 hour lockout.
    pub const LOGIN: GuardPolicy = GuardPolicy {
        max_attempts: 3,
        lockout_secs: 3600,
    };

    /// Edit/delete PIN: 3 attempts, 15 minute lockout.
    pub const ACTION_PIN: GuardPolicy = GuardPolicy {
        max_attempts: 3,
        lockout_secs: 900,
    };

    pub fn lockout(&self) -> Duration {
        Duration::seconds(self.lockout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttemptGuardState {
    pub attempt_count: u32,
    pub blocked_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    Open { attempts_left: u32 },
    Locked { remaining_secs: u64 },
}

/// Outcome of recording a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Still open; this many attempts remain before lockout.
    Retry { attempts_left: u32 },
    /// This failure triggered the lockout.
    LockedOut { remaining_secs: u64 },
    /// Guard was already locked; the attempt was not counted.
    Rejected { remaining_secs: u64 },
}

impl AttemptGuardState {
    /// Seconds until unlock, rounded up. `None` when open (or the deadline has passed).
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> Option<u64> {
        let until = self.blocked_until?;
        let ms = (until - now).num_milliseconds();
        if ms <= 0 {
            return None;
        }
        Some((ms as u64).div_ceil(1000))
    }

    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.remaining_secs(now).is_some()
    }

    pub fn status(&self, policy: &GuardPolicy, now: DateTime<Utc>) -> GuardStatus {
        match self.remaining_secs(now) {
            Some(remaining_secs) => GuardStatus::Locked { remaining_secs },
            None => GuardStatus::Open {
                attempts_left: policy.max_attempts.saturating_sub(self.attempt_count),
            },
        }
    }

    /// Locked → Open once the deadline has passed. Returns true when state changed.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> bool {
        match self.blocked_until {
            Some(_) if !self.is_locked(now) => {
                self.blocked_until = None;
                self.attempt_count = 0;
                true
            }
            _ => false,
        }
    }

    pub fn record_failure(&mut self, policy: &GuardPolicy, now: DateTime<Utc>) -> FailureOutcome {
        self.refresh(now);
        if let Some(remaining_secs) = self.remaining_secs(now) {
            return FailureOutcome::Rejected { remaining_secs };
        }

        self.attempt_count += 1;
        if self.attempt_count >= policy.max_attempts {
            self.attempt_count = 0;
            self.blocked_until = Some(now + policy.lockout());
            return FailureOutcome::LockedOut {
                remaining_secs: policy.lockout_secs.max(0) as u64,
            };
        }
        FailureOutcome::Retry {
            attempts_left: policy.max_attempts - self.attempt_count,
        }
    }

    /// Success resets the counter and clears any stale lockout marker.
    pub fn record_success(&mut self) {
        self.attempt_count = 0;
        self.blocked_until = None;
    }
}

/// `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_remaining(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
