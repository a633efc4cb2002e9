//! OfferMatrix client: job-application and interview tracking against the
//! OfferMatrix REST backend, with optimistic list edits and optional LLM
//! helpers.

#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

pub mod api;
pub mod cli;
pub mod core;
pub mod llm;
pub mod optimistic;
pub mod quick_add;
pub mod stats;
pub mod types;
pub mod utils;

pub use crate::core::{ApiClient, ConfigManager, ConfigStore, FileStore, MemoryStore};
pub use crate::optimistic::{Collection, MutationController, MutationOutcome};
pub use crate::types::{Application, ApplicationStatus, Interview, InterviewStatus};
