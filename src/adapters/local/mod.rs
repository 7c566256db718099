pub mod auth_adapter;

pub use auth_adapter::LocalAuthAdapter;
