//! Lockout countdown. Recomputes remaining lockout time every second while the
//! guard is locked and performs the Locked → Open transition when it expires.
//!
//! The timer task lives as long as its handle: dropping the handle aborts it,
//! and it stops by itself once the guard is open.

use crate::domain::{DomainError, GuardStatus};
use crate::usecases::guard_service::AttemptGuardService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const TICK: Duration = Duration::from_secs(1);

pub struct LockoutCountdown {
    rx: watch::Receiver<Option<u64>>,
    task: JoinHandle<()>,
}

impl LockoutCountdown {
    pub async fn start(guard: Arc<AttemptGuardService>) -> Result<Self, DomainError> {
        Self::start_with_tick(guard, TICK).await
    }

    pub async fn start_with_tick(
        guard: Arc<AttemptGuardService>,
        tick: Duration,
    ) -> Result<Self, DomainError> {
        let initial = match guard.refresh().await? {
            GuardStatus::Locked { remaining_secs } => Some(remaining_secs),
            GuardStatus::Open { .. } => None,
        };
        let (tx, rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            if initial.is_none() {
                return;
            }
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match guard.refresh().await {
                    Ok(GuardStatus::Locked { remaining_secs }) => {
                        if tx.send(Some(remaining_secs)).is_err() {
                            break;
                        }
                    }
                    Ok(GuardStatus::Open { .. }) => {
                        debug!("lockout countdown finished");
                        let _ = tx.send(None);
                        break;
                    }
                    Err(e) => warn!(error = %e, "lockout countdown could not persist guard state"),
                }
            }
        });

        Ok(Self { rx, task })
    }

    /// Seconds left, or `None` once the guard is open.
    pub fn remaining(&self) -> Option<u64> {
        *self.rx.borrow()
    }

    /// Wait for the next tick. Returns false once the countdown has ended.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Resolve when the guard is open again.
    pub async fn wait_until_open(mut self) {
        while self.remaining().is_some() {
            if !self.changed().await {
                break;
            }
        }
    }
}

impl Drop for LockoutCountdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}
