#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod infra;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod scheduler;
pub mod services;
pub mod state;

// Re-exports for public API
pub use config::db::{DbKind, RuntimeEnv};
pub use config::game::{FallbackDraw, GameConfig};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use infra::state::build_state;
pub use middleware::RequestLog;
pub use scheduler::{RoundTrigger, TriggerOutcome, WeeklySchedule};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
