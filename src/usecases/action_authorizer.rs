//! PIN gate for destructive membership actions (edit, delete).
//!
//! The PIN is compared locally against configuration. This is UX-only gating
//! that deters accidental edits; it is not an access-control boundary.
//! On success the caller performs the requested action itself.

use crate::domain::{DomainError, FailureOutcome, GuardStatus, MembershipRecord};
use crate::usecases::guard_service::{AttemptGuardService, blocked_message, describe_failure};
use std::sync::Arc;
use tracing::{info, warn};

/// Action waiting for PIN confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Edit(MembershipRecord),
    Delete(MembershipRecord),
}

impl PendingAction {
    pub fn record(&self) -> &MembershipRecord {
        match self {
            Self::Edit(r) | Self::Delete(r) => r,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Edit(_) => "edit",
            Self::Delete(_) => "delete",
        }
    }
}

/// An open PIN prompt. Consumed by `submit`; handed back on a retryable failure.
#[derive(Debug)]
pub struct PinChallenge {
    action: PendingAction,
}

impl PinChallenge {
    pub fn action(&self) -> &PendingAction {
        &self.action
    }
}

#[derive(Debug)]
pub enum ActionRequest {
    Challenge(PinChallenge),
    Blocked { remaining_secs: u64 },
    /// No PIN configured; edit/delete are disabled.
    Unavailable,
}

#[derive(Debug)]
pub enum PinOutcome {
    Authorized(PendingAction),
    WrongPin {
        challenge: PinChallenge,
        attempts_left: u32,
    },
    LockedOut {
        remaining_secs: u64,
    },
    Blocked {
        remaining_secs: u64,
    },
}

pub struct ActionAuthorizer {
    guard: Arc<AttemptGuardService>,
    pin: Option<String>,
}

impl ActionAuthorizer {
    pub fn new(guard: Arc<AttemptGuardService>, pin: Option<String>) -> Self {
        let pin = pin.filter(|p| !p.is_empty());
        if pin.is_none() {
            warn!("no action PIN configured; edit and delete are disabled");
        }
        Self { guard, pin }
    }

    pub fn guard(&self) -> &Arc<AttemptGuardService> {
        &self.guard
    }

    /// Open a PIN prompt for `action`, unless the guard is locked.
    pub async fn request(&self, action: PendingAction) -> Result<ActionRequest, DomainError> {
        if self.pin.is_none() {
            return Ok(ActionRequest::Unavailable);
        }
        Ok(match self.guard.refresh().await? {
            GuardStatus::Locked { remaining_secs } => ActionRequest::Blocked { remaining_secs },
            GuardStatus::Open { .. } => ActionRequest::Challenge(PinChallenge { action }),
        })
    }

    pub async fn submit(
        &self,
        challenge: PinChallenge,
        pin: &str,
    ) -> Result<PinOutcome, DomainError> {
        if let GuardStatus::Locked { remaining_secs } = self.guard.refresh().await? {
            return Ok(PinOutcome::Blocked { remaining_secs });
        }

        if self.pin.as_deref() == Some(pin) {
            self.guard.record_success().await?;
            info!(
                action = challenge.action.verb(),
                id = %challenge.action.record().id,
                "action authorized"
            );
            return Ok(PinOutcome::Authorized(challenge.action));
        }

        Ok(match self.guard.record_failure().await? {
            FailureOutcome::Retry { attempts_left } => PinOutcome::WrongPin {
                challenge,
                attempts_left,
            },
            FailureOutcome::LockedOut { remaining_secs } => PinOutcome::LockedOut { remaining_secs },
            FailureOutcome::Rejected { remaining_secs } => PinOutcome::Blocked { remaining_secs },
        })
    }

    pub fn describe(&self, outcome: &PinOutcome) -> String {
        let policy = self.guard.policy();
        match outcome {
            PinOutcome::Authorized(action) => format!("PIN accepted; {} allowed.", action.verb()),
            PinOutcome::WrongPin { attempts_left, .. } => describe_failure(
                "Incorrect PIN",
                FailureOutcome::Retry {
                    attempts_left: *attempts_left,
                },
                &policy,
            ),
            PinOutcome::LockedOut { remaining_secs } => describe_failure(
                "Incorrect PIN",
                FailureOutcome::LockedOut {
                    remaining_secs: *remaining_secs,
                },
                &policy,
            ),
            PinOutcome::Blocked { remaining_secs } => blocked_message(*remaining_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MembershipStatus, MembershipType, PlanTier};
    use crate::usecases::guard_service::test_support::{ManualClock, MemoryState};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record() -> MembershipRecord {
        MembershipRecord {
            id: "m-1".into(),
            client_name: "Ana Lopez Garcia".into(),
            client_phone: "5512345678".into(),
            client_email: None,
            membership_type: MembershipType::Individual,
            plan_name: PlanTier::Complete,
            areas: vec![],
            monthly_payment: 675,
            initial_payment: 675,
            total_sessions: 9,
            completed_sessions: 0,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: None,
            status: MembershipStatus::Active,
            notes: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    fn authorizer(pin: Option<&str>) -> (Arc<ManualClock>, ActionAuthorizer) {
        let state = Arc::new(MemoryState::default());
        let clock = Arc::new(ManualClock::new());
        let guard = Arc::new(AttemptGuardService::action_pin(state, clock.clone()));
        (clock, ActionAuthorizer::new(guard, pin.map(String::from)))
    }

    async fn challenge(auth: &ActionAuthorizer, action: PendingAction) -> PinChallenge {
        match auth.request(action).await.unwrap() {
            ActionRequest::Challenge(c) => c,
            other => panic!("expected challenge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_correct_pin_returns_requested_action() {
        let (_clock, auth) = authorizer(Some("4321"));
        let c = challenge(&auth, PendingAction::Delete(record())).await;
        match auth.submit(c, "4321").await.unwrap() {
            PinOutcome::Authorized(PendingAction::Delete(r)) => assert_eq!(r.id, "m-1"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_three_wrong_pins_block_until_window_elapses() {
        let (clock, auth) = authorizer(Some("4321"));
        let mut c = challenge(&auth, PendingAction::Edit(record())).await;

        for expected_left in [2, 1] {
            match auth.submit(c, "0000").await.unwrap() {
                PinOutcome::WrongPin {
                    challenge,
                    attempts_left,
                } => {
                    assert_eq!(attempts_left, expected_left);
                    c = challenge;
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        let locked = auth.submit(c, "0000").await.unwrap();
        assert!(matches!(
            locked,
            PinOutcome::LockedOut {
                remaining_secs: 900
            }
        ));
        assert_eq!(
            auth.describe(&locked),
            "Too many failed attempts. Access blocked for 15 minutes."
        );

        // Fourth attempt inside the window: no prompt is offered.
        clock.advance(300);
        match auth.request(PendingAction::Edit(record())).await.unwrap() {
            ActionRequest::Blocked { remaining_secs } => assert_eq!(remaining_secs, 600),
            other => panic!("unexpected {:?}", other),
        }

        clock.advance(600);
        let c = challenge(&auth, PendingAction::Edit(record())).await;
        assert!(matches!(
            auth.submit(c, "4321").await.unwrap(),
            PinOutcome::Authorized(PendingAction::Edit(_))
        ));
    }

    #[tokio::test]
    async fn test_pin_lockout_drives_a_countdown() {
        let (clock, auth) = authorizer(Some("4321"));
        for _ in 0..3 {
            let c = challenge(&auth, PendingAction::Edit(record())).await;
            auth.submit(c, "0000").await.unwrap();
        }

        let mut countdown = crate::usecases::LockoutCountdown::start_with_tick(
            Arc::clone(auth.guard()),
            std::time::Duration::from_millis(10),
        )
        .await
        .unwrap();
        assert_eq!(countdown.remaining(), Some(900));

        clock.advance(60);
        while countdown.remaining() != Some(840) {
            assert!(countdown.changed().await);
        }

        clock.advance(840);
        countdown.wait_until_open().await;
        assert!(matches!(
            auth.request(PendingAction::Edit(record())).await.unwrap(),
            ActionRequest::Challenge(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_pin_disables_actions() {
        let (_clock, auth) = authorizer(Some(""));
        assert!(matches!(
            auth.request(PendingAction::Edit(record())).await.unwrap(),
            ActionRequest::Unavailable
        ));
    }
}
