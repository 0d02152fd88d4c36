//! Collaborator abstractions
//!
//! Every piece of process-external state the core touches (the OS secret
//! store, the store file, the upstream login flow and its side config file)
//! is reached through one of these traits, so tests can substitute in-memory
//! fakes and frontends pick the concrete adapters.

mod config_snapshots;
mod login_flow;
mod secret_store;
mod store_repository;

pub use config_snapshots::ConfigSnapshots;
pub use login_flow::LoginFlow;
pub use secret_store::{SecretSlot, SecretStore};
pub use store_repository::StoreRepository;
