//! Project Time - per-project active time tracking
//!
//! This library tracks how long a project's editor window is focused versus
//! elsewhere, from focus, save, close and shutdown events, and persists the
//! totals to a small JSON file inside the project.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TrackerError;
pub use state::{AppState, CoderType, TimeTracker, Totals};
pub use services::PersistentStore;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
