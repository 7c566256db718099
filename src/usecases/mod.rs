//! Application use cases. Orchestrate domain logic via ports.

pub mod action_authorizer;
pub mod auth_service;
pub mod countdown;
pub mod guard_service;
pub mod membership_service;

pub use action_authorizer::{ActionAuthorizer, ActionRequest, PendingAction, PinChallenge, PinOutcome};
pub use auth_service::{AuthService, LoginOutcome};
pub use countdown::LockoutCountdown;
pub use guard_service::{AttemptGuardService, blocked_message, describe_failure};
pub use membership_service::{MembershipFilter, MembershipForm, MembershipService, MembershipStats};
