//! Main application state management

use std::{
    path::Path,
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use tracing::info;

use crate::{
    services::{InitPrompt, NoticeBoard},
    utils::Clock,
};
use super::{TimeTracker, TrackerSnapshot};

/// Shared state handed to the HTTP handlers and background tasks.
///
/// The tracker is the only mutable accounting state and sits behind a single
/// mutex, so concurrent requests never close the same interval twice.
#[derive(Debug)]
pub struct AppState {
    /// The project's time tracker
    pub tracker: Arc<Mutex<TimeTracker>>,
    /// Notices raised by the tracker, shown in /status
    pub notices: Arc<NoticeBoard>,
    /// Checkpoint period in minutes, 0 when disabled
    pub checkpoint_interval_minutes: u64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Signalled when a client asks the daemon to stop
    pub shutdown_requested: Notify,
}

impl AppState {
    /// Create the tracker for `project_root` and wrap it in application state
    pub fn new(
        project_root: Option<&Path>,
        prompt: &dyn InitPrompt,
        clock: Arc<dyn Clock>,
        port: u16,
        host: String,
        checkpoint_interval_minutes: u64,
    ) -> Self {
        let notices = Arc::new(NoticeBoard::new());
        let tracker = TimeTracker::new(project_root, prompt, clock, notices.clone());
        Self::with_tracker(tracker, notices, port, host, checkpoint_interval_minutes)
    }

    /// Wrap an already constructed tracker
    pub fn with_tracker(
        tracker: TimeTracker,
        notices: Arc<NoticeBoard>,
        port: u16,
        host: String,
        checkpoint_interval_minutes: u64,
    ) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
            notices,
            checkpoint_interval_minutes,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            shutdown_requested: Notify::new(),
        }
    }

    /// Run one tracker hook under the lock and record it as the last action
    pub fn apply<F>(&self, action: &str, hook: F) -> Result<TrackerSnapshot, String>
    where
        F: FnOnce(&mut TimeTracker),
    {
        let mut tracker = self.tracker.lock()
            .map_err(|e| format!("Failed to lock tracker: {}", e))?;

        hook(&mut *tracker);
        let snapshot = tracker.snapshot();
        drop(tracker); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(snapshot)
    }

    /// Window focus changed
    pub fn focus_changed(&self, focused: bool) -> Result<TrackerSnapshot, String> {
        info!("Window focus changed: focused={}", focused);
        self.apply(
            if focused { "focus" } else { "blur" },
            |tracker| tracker.on_focus_changed(focused),
        )
    }

    pub fn document_saved(&self) -> Result<TrackerSnapshot, String> {
        self.apply("save", TimeTracker::on_document_saved)
    }

    pub fn document_closed(&self) -> Result<TrackerSnapshot, String> {
        self.apply("close", TimeTracker::on_document_closed)
    }

    pub fn workspace_changed(&self) -> Result<TrackerSnapshot, String> {
        self.apply("workspace-changed", TimeTracker::on_workspace_changed)
    }

    /// Periodic checkpoint from the background task
    pub fn checkpoint(&self) -> Result<TrackerSnapshot, String> {
        self.apply("checkpoint", TimeTracker::checkpoint)
    }

    /// Final flush. Safe to call more than once.
    pub fn shutdown(&self) -> Result<TrackerSnapshot, String> {
        info!("Flushing tracker for shutdown");
        self.apply("shutdown", TimeTracker::on_shutdown)
    }

    /// Flush and ask the server loop to exit
    pub fn request_shutdown(&self) -> Result<TrackerSnapshot, String> {
        let snapshot = self.shutdown()?;
        self.shutdown_requested.notify_one();
        Ok(snapshot)
    }

    /// Get the current tracker snapshot
    pub fn get_snapshot(&self) -> Result<TrackerSnapshot, String> {
        self.tracker.lock()
            .map(|tracker| tracker.snapshot())
            .map_err(|e| format!("Failed to lock tracker: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::FixedAnswer, state::Mode, utils::ManualClock};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn test_state(tmp: &TempDir, clock: Arc<ManualClock>) -> AppState {
        AppState::new(
            Some(tmp.path()),
            &FixedAnswer(true),
            clock,
            0,
            "127.0.0.1".to_string(),
            0,
        )
    }

    #[test]
    fn hooks_update_snapshot_and_last_action() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        ));
        let state = test_state(&tmp, clock.clone());

        clock.advance_secs(60);
        let snapshot = state.focus_changed(false).unwrap();
        assert_eq!(snapshot.totals.active_seconds, 60.0);
        assert_eq!(snapshot.interval.map(|open| open.mode), Some(Mode::Other));

        let (action, when) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("blur"));
        assert!(when.is_some());
    }

    #[test]
    fn request_shutdown_flushes_and_notifies() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        ));
        let state = test_state(&tmp, clock.clone());

        clock.advance_secs(15);
        let snapshot = state.request_shutdown().unwrap();
        assert!(snapshot.shut_down);
        assert_eq!(snapshot.totals.active_seconds, 15.0);

        // A second flush changes nothing
        clock.advance_secs(15);
        let again = state.shutdown().unwrap();
        assert_eq!(again.totals, snapshot.totals);
    }

    #[test]
    fn concurrent_hooks_count_each_second_once() {
        let tmp = TempDir::new().unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let state = test_state(&tmp, clock.clone());

        clock.advance_secs(100);
        std::thread::scope(|scope| {
            for i in 0..8 {
                let state = &state;
                scope.spawn(move || {
                    if i % 2 == 0 {
                        state.document_saved().unwrap();
                    } else {
                        state.focus_changed(false).unwrap();
                    }
                });
            }
        });

        let snapshot = state.shutdown().unwrap();
        let totals = snapshot.totals;
        assert_eq!(totals.active_seconds + totals.other_seconds, 100.0);

        let stored = crate::services::PersistentStore::for_project(Some(tmp.path()))
            .load()
            .unwrap();
        assert_eq!(stored.active_seconds, totals.active_seconds);
        assert_eq!(stored.other_seconds, totals.other_seconds);
    }

    #[test]
    fn uptime_is_formatted() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let state = test_state(&tmp, clock);
        assert!(state.get_uptime().ends_with('s'));
    }
}
