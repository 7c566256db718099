//! Local persistence: JSON state file and the SQLite fallback store.

pub mod sqlite_store;
pub mod state_json;

pub use sqlite_store::SqliteMembershipStore;
pub use state_json::StateJson;
