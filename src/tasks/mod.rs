//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod checkpoint_timer;

// Re-export main functions
pub use checkpoint_timer::checkpoint_timer_task;
