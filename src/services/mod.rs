//! Collaborators of the tracker
//!
//! This module contains the timer data file store and the seams to the
//! user: the first-run prompt and non-blocking notifications.

pub mod notify;
pub mod prompt;
pub mod store;

// Re-export main items
pub use notify::{Notice, NoticeBoard, NoticeLevel, Notifier};
pub use prompt::{FixedAnswer, InitPrompt, StdinPrompt};
pub use store::PersistentStore;
