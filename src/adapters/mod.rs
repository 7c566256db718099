//! Infrastructure adapters. Implement outbound ports.
//!
//! Hosted backend, local fallback store, JSON state, CSV export, terminal UI.
//! Map errors to DomainError.

pub mod clock;
pub mod export;
pub mod local;
pub mod persistence;
pub mod supabase;
pub mod ui;
