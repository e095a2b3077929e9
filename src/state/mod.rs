//! State management module
//!
//! This module contains the timer totals, the time accounting state machine,
//! the derived coder status, and the shared application state.

pub mod app_state;
pub mod coder_type;
pub mod timer_state;
pub mod tracker;

// Re-export main types
pub use app_state::AppState;
pub use coder_type::{format_time_spent, CoderType};
pub use timer_state::{Mode, TimerState, Totals};
pub use tracker::{OpenInterval, TimeTracker, TrackerSnapshot};
