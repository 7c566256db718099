//! Hosted backend adapters (Supabase). One shared client carries the session token.

pub mod auth_adapter;
pub mod client;
pub mod membership_store;

pub use auth_adapter::SupabaseAuthAdapter;
pub use client::SupabaseClient;
pub use membership_store::SupabaseMembershipStore;
