//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    DomainError, MembershipPatch, MembershipRecord, NewMembership, SignInOutcome,
};
use chrono::{DateTime, Utc};

/// Membership store. CRUD over the `memberships` collection.
#[async_trait::async_trait]
pub trait MembershipStore: Send + Sync {
    /// All memberships, newest `created_at` first.
    async fn list(&self) -> Result<Vec<MembershipRecord>, DomainError>;

    /// Insert a membership. Returns the id assigned by the store.
    async fn insert(&self, membership: &NewMembership) -> Result<String, DomainError>;

    /// Apply a partial update. Only fields present in `patch` change.
    async fn update(&self, id: &str, patch: &MembershipPatch) -> Result<(), DomainError>;

    async fn delete(&self, id: &str) -> Result<(), DomainError>;
}

/// Auth port. Credential check against the external auth service.
#[async_trait::async_trait]
pub trait AuthPort: Send + Sync {
    /// Wrong credentials return `Ok(SignInOutcome::InvalidCredentials)`;
    /// `Err` is reserved for transport/service failures.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, DomainError>;

    async fn sign_out(&self) -> Result<(), DomainError>;
}

/// State port. Durable string key-value store for guard counters, lockout
/// deadlines and the authenticated flag.
#[async_trait::async_trait]
pub trait StatePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}

/// Wall clock. Injected so guard timing is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
