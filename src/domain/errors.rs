//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. Wrong credentials, wrong PINs
//! and lockouts are not errors; they are guard outcomes.

use crate::domain::validation::ValidationErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Membership store error: {0}")]
    Store(String),

    #[error("Authentication service error: {0}")]
    Auth(String),

    #[error("State error: {0}")]
    State(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl DomainError {
    /// Message shown to the operator. External-service details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(_) => "Could not reach the membership database. Please try again.".into(),
            Self::Auth(_) => "Connection error while signing in.".into(),
            Self::Validation(errors) => errors.to_string(),
            other => other.to_string(),
        }
    }
}
