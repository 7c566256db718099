//! Core domain layer. No external I/O dependencies.
//!
//! Pricing catalog, quote calculator, attempt guard and form rules live here.

pub mod catalog;
pub mod entities;
pub mod errors;
pub mod guard;
pub mod quote;
pub mod validation;

pub use entities::{
    Area, AreaCategory, MembershipPatch, MembershipRecord, MembershipStatus, MembershipType,
    NewMembership, PlanTier, Session, SignInOutcome,
};
pub use errors::DomainError;
pub use guard::{AttemptGuardState, FailureOutcome, GuardPolicy, GuardStatus, format_remaining};
pub use quote::{AreaSelection, Quote, calculate_quote};
pub use validation::ValidationErrors;
