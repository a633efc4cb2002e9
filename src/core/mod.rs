// src/core/mod.rs
//! Configuration, persisted client state and the backend HTTP client

pub mod config_manager;
pub mod service_client;
pub mod session;
pub mod state_store;

pub use config_manager::ConfigManager;
pub use service_client::{ApiClient, ApiError};
pub use session::SessionClaims;
pub use state_store::{ConfigStore, FileStore, MemoryStore, StoredState};
