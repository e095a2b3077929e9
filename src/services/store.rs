//! Per-project timer data file
//!
//! Timer totals live in `<project>/.vscode/timer-data.json`:
//!
//! ```json
//! {
//!   "version": 1,
//!   "totalTime": 700.0,
//!   "otherTime": 200.0,
//!   "lastUpdated": 1718000000000
//! }
//! ```
//!
//! Every field is always written. On read, missing fields default to zero and
//! the older single-bucket layouts (`total_time`/`last_updated`, or
//! `timer` with an ISO-8601 `lastUpdated`) are still understood.
//!
//! Writes go to a temp file in the same directory and are renamed over the
//! data file, so a crash mid-write leaves the previous contents intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::state::TimerState;

/// Hidden per-project directory holding the data file
pub const STATE_DIR: &str = ".vscode";
/// Data file name inside [`STATE_DIR`]
pub const STATE_FILE: &str = "timer-data.json";
/// Schema version written by this release
pub const SCHEMA_VERSION: u32 = 1;

/// The on-disk JSON structure
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateFile {
    /// Files from before versioning carry no version and read as 0
    #[serde(default)]
    version: u32,
    #[serde(
        default,
        alias = "total_time",
        alias = "timer",
        deserialize_with = "seconds_or_null"
    )]
    total_time: f64,
    #[serde(default, alias = "other_time", deserialize_with = "seconds_or_null")]
    other_time: f64,
    #[serde(default, alias = "last_updated", deserialize_with = "epoch_millis")]
    last_updated: i64,
}

impl StateFile {
    fn from_state(state: &TimerState) -> Self {
        Self {
            version: SCHEMA_VERSION,
            total_time: state.active_seconds,
            other_time: state.other_seconds,
            last_updated: state.last_updated.timestamp_millis(),
        }
    }

    fn into_state(self) -> TimerState {
        TimerState {
            active_seconds: non_negative(self.total_time),
            other_seconds: non_negative(self.other_time),
            last_updated: DateTime::<Utc>::from_timestamp_millis(self.last_updated)
                .unwrap_or_default(),
        }
    }
}

fn non_negative(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Null counts as zero. Older releases saved NaN totals, which JSON writes as null.
fn seconds_or_null<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Accepts epoch millis (integer or float), an RFC 3339 string, or null.
fn epoch_millis<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Raw::Millis(millis)) => Ok(millis),
        Some(Raw::Float(millis)) => Ok(millis as i64),
        Some(Raw::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.timestamp_millis())
            .map_err(serde::de::Error::custom),
    }
}

/// Reads and writes the timer data file for one project.
///
/// A store without a path (no project root) loads as zero and refuses to save.
#[derive(Debug, Clone)]
pub struct PersistentStore {
    path: Option<PathBuf>,
}

impl PersistentStore {
    /// Store for the data file under `project_root`, or a pathless store
    pub fn for_project(project_root: Option<&Path>) -> Self {
        Self {
            path: project_root.map(|root| root.join(STATE_DIR).join(STATE_FILE)),
        }
    }

    /// Store backed by an explicit file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether a data file is present on disk
    pub fn exists(&self) -> bool {
        self.path.as_deref().is_some_and(Path::exists)
    }

    /// Load the stored totals.
    ///
    /// A missing path or missing file yields a zero state without touching
    /// disk. An empty file is also treated as zero. A file that cannot be
    /// read is [`TrackerError::StoreReadFailed`]; one that does not parse,
    /// or declares a newer schema, is [`TrackerError::StoreUnreadable`].
    pub fn load(&self) -> Result<TimerState> {
        let Some(path) = self.path.as_deref() else {
            return Ok(TimerState::new());
        };
        if !path.exists() {
            debug!("No timer data at {}", path.display());
            return Ok(TimerState::new());
        }

        let content =
            fs::read_to_string(path).map_err(|source| TrackerError::StoreReadFailed {
                path: path.to_path_buf(),
                source,
            })?;

        if content.trim().is_empty() {
            debug!("Timer data at {} is empty, starting from zero", path.display());
            return Ok(TimerState::new());
        }

        let file: StateFile =
            serde_json::from_str(&content).map_err(|e| TrackerError::StoreUnreadable {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        if file.version > SCHEMA_VERSION {
            return Err(TrackerError::StoreUnreadable {
                path: path.to_path_buf(),
                details: format!(
                    "unsupported schema version {} (expected {} or lower)",
                    file.version, SCHEMA_VERSION
                ),
            });
        }

        Ok(file.into_state())
    }

    /// Write `state` as pretty-printed JSON, creating the directory if needed.
    pub fn save(&self, state: &TimerState) -> Result<()> {
        let path = self.path.as_deref().ok_or(TrackerError::NoProjectRoot)?;
        let content = serde_json::to_string_pretty(&StateFile::from_state(state))?;

        let unwritable = |source: std::io::Error| TrackerError::StoreUnwritable {
            path: path.to_path_buf(),
            source,
        };

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(unwritable)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(unwritable)?;
        tmp.write_all(content.as_bytes()).map_err(unwritable)?;
        tmp.flush().map_err(unwritable)?;
        tmp.as_file().sync_all().map_err(unwritable)?;
        tmp.persist(path).map_err(|e| unwritable(e.error))?;

        debug!("Saved timer data to {}", path.display());
        Ok(())
    }

    /// Move an unreadable data file aside to `<file>.corrupt-<millis>` and
    /// return the new location.
    pub fn quarantine(&self, now: DateTime<Utc>) -> Result<PathBuf> {
        let path = self.path.as_deref().ok_or(TrackerError::NoProjectRoot)?;
        let mut aside = path.as_os_str().to_owned();
        aside.push(format!(".corrupt-{}", now.timestamp_millis()));
        let aside = PathBuf::from(aside);

        fs::rename(path, &aside).map_err(|source| TrackerError::StoreUnwritable {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Moved unreadable timer data to {}", aside.display());
        Ok(aside)
    }
}
