//! Error types for tracker and store operations

use std::path::PathBuf;

/// Everything that can go wrong while loading or persisting timer data.
///
/// None of these are fatal: the tracker catches them at the hook boundary,
/// logs them and hands them to the [`Notifier`](crate::services::Notifier).
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("No project folder found, time will not be saved")]
    NoProjectRoot,

    #[error("Failed to read timer data at {path}: {source}")]
    StoreReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Timer data at {path} is unreadable: {details}")]
    StoreUnreadable { path: PathBuf, details: String },

    #[error("Failed to write timer data to {path}: {source}")]
    StoreUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize timer data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience type alias for results carrying a [`TrackerError`].
pub type Result<T> = std::result::Result<T, TrackerError>;
