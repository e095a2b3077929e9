//! Time accounting state machine
//!
//! The tracker always has exactly one open interval while running, attributed
//! to either the active bucket (editor focused) or the other bucket (focus
//! elsewhere). Every hook closes the open interval into its bucket, persists
//! the totals, then opens the next interval. Losing focus is the start of
//! "other" time, not a pause, so wall-clock time is never dropped.
//!
//! Persisted totals only ever contain closed intervals: a crash loses at most
//! the interval that was open, and nothing is counted twice.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::TrackerError,
    services::{InitPrompt, Notice, Notifier, PersistentStore},
    utils::{elapsed_seconds, Clock},
};

use super::{CoderType, Mode, TimerState, Totals};

/// The currently running interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpenInterval {
    pub start: DateTime<Utc>,
    pub mode: Mode,
}

/// Read-only view of the tracker for status displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub totals: Totals,
    pub coder_type: CoderType,
    pub label: &'static str,
    pub interval: Option<OpenInterval>,
    pub persistence_enabled: bool,
    pub data_file: Option<PathBuf>,
    pub last_updated: DateTime<Utc>,
    pub shut_down: bool,
}

/// Per-project active time tracker.
///
/// Owned by the host integration layer; hooks take `&mut self`, so callers
/// that receive events on several threads must put it behind one lock.
pub struct TimeTracker {
    state: TimerState,
    interval: Option<OpenInterval>,
    store: PersistentStore,
    /// Cleared for the rest of the session when the user declines the timer
    persistence_enabled: bool,
    /// No data file existed at load time, so the user has not been asked yet
    needs_initialization: bool,
    /// A write failed and the user has been told; reset on the next success
    write_failing: bool,
    shut_down: bool,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl TimeTracker {
    /// Load the project's totals, ask about initialization if there is no
    /// data file yet, and open the first active interval.
    pub fn new(
        project_root: Option<&Path>,
        prompt: &dyn InitPrompt,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let mut tracker = Self::load(project_root, clock, notifier);
        tracker.prompt_timer_initialization(prompt);
        tracker.open_interval(Mode::Active);
        tracker
    }

    /// Build a tracker from whatever is on disk without prompting or opening
    /// an interval.
    fn load(
        project_root: Option<&Path>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let store = PersistentStore::for_project(project_root);
        let mut persistence_enabled = true;
        let mut needs_initialization = false;

        let state = match store.path() {
            None => {
                notifier.notify(Notice::error(TrackerError::NoProjectRoot.to_string()));
                TimerState::new()
            }
            Some(path) if !store.exists() => {
                debug!("No timer data at {}", path.display());
                needs_initialization = true;
                TimerState::new()
            }
            Some(path) => match store.load() {
                Ok(state) => {
                    info!(
                        "Loaded project data from {} ({:.0}s active, {:.0}s other)",
                        path.display(),
                        state.active_seconds,
                        state.other_seconds
                    );
                    state
                }
                Err(e @ TrackerError::StoreReadFailed { .. }) => {
                    // The file may be intact; leave it alone and never write over it
                    warn!("{}", e);
                    persistence_enabled = false;
                    notifier.notify(Notice::error(format!(
                        "{}. Time will not be saved this session.",
                        e
                    )));
                    TimerState::new()
                }
                Err(e) => {
                    warn!("{}", e);
                    match store.quarantine(clock.now()) {
                        Ok(aside) => notifier.notify(Notice::warning(format!(
                            "Timer data was unreadable and has been moved to {}. Starting from zero.",
                            aside.display()
                        ))),
                        Err(move_err) => {
                            persistence_enabled = false;
                            notifier.notify(Notice::error(format!(
                                "Timer data is unreadable and could not be moved aside ({}). Time will not be saved this session.",
                                move_err
                            )));
                        }
                    }
                    TimerState::new()
                }
            },
        };

        Self {
            state,
            interval: None,
            store,
            persistence_enabled,
            needs_initialization,
            write_failing: false,
            shut_down: false,
            clock,
            notifier,
        }
    }

    /// Ask once whether to create the data file for a project that has none.
    ///
    /// Accepting writes a zero-state record right away. Declining turns off
    /// persistence for the rest of the session; accounting carries on in
    /// memory. Returns whether persistence is enabled afterwards.
    pub fn prompt_timer_initialization(&mut self, prompt: &dyn InitPrompt) -> bool {
        if !self.needs_initialization {
            return self.persistence_enabled;
        }
        self.needs_initialization = false;

        let Some(path) = self.store.path() else {
            return self.persistence_enabled;
        };

        if prompt.confirm_initialization(path) {
            self.persist();
            if !self.write_failing {
                self.notifier
                    .notify(Notice::info("Timer initialized for this project!"));
            }
        } else {
            self.persistence_enabled = false;
            self.notifier.notify(Notice::info(
                "No timer created. Time is tracked for this session only.",
            ));
        }
        self.persistence_enabled
    }

    /// The editor window gained or lost focus.
    ///
    /// Gaining focus ends any "other" interval and starts active time; a
    /// repeated focus event while already active keeps the running interval.
    /// Losing focus closes the current interval and starts "other" time.
    pub fn on_focus_changed(&mut self, focused: bool) {
        if self.shut_down {
            debug!("Ignoring focus change after shutdown");
            return;
        }

        if focused {
            if matches!(self.interval, Some(OpenInterval { mode: Mode::Active, .. })) {
                debug!("Focus gained while already active");
                return;
            }
            self.close_and_persist();
            self.open_interval(Mode::Active);
        } else {
            self.close_and_persist();
            self.open_interval(Mode::Other);
        }
    }

    /// A document was saved: checkpoint the running interval.
    pub fn on_document_saved(&mut self) {
        self.checkpoint();
    }

    /// A document was closed: checkpoint the running interval.
    pub fn on_document_closed(&mut self) {
        self.checkpoint();
    }

    /// The workspace folders changed: checkpoint the running interval.
    pub fn on_workspace_changed(&mut self) {
        self.checkpoint();
    }

    /// Close the open interval into its bucket, persist, and reopen an
    /// interval in the same mode.
    pub fn checkpoint(&mut self) {
        if self.shut_down {
            debug!("Ignoring checkpoint after shutdown");
            return;
        }
        let mode = self.interval.map(|open| open.mode).unwrap_or(Mode::Active);
        self.close_and_persist();
        self.open_interval(mode);
    }

    /// Final closeout. No interval is opened afterwards and later hooks are
    /// ignored. Calling it twice is harmless.
    pub fn on_shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.close_and_persist();
        self.shut_down = true;
        info!(
            "Tracker shut down with {:.0}s active, {:.0}s other",
            self.state.active_seconds, self.state.other_seconds
        );
    }

    /// Flushed totals. The running interval is not included.
    pub fn current_totals(&self) -> Totals {
        self.state.totals()
    }

    /// Status tier for the flushed active time
    pub fn status_label(&self) -> CoderType {
        CoderType::from_active_seconds(self.state.active_seconds)
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn open_interval_info(&self) -> Option<OpenInterval> {
        self.interval
    }

    /// Whether writes are allowed. False after the user declined the timer
    /// or when the data file could not be recovered.
    pub fn persistence_enabled(&self) -> bool {
        self.persistence_enabled
    }

    /// Whether totals actually reach disk: a project root exists and
    /// persistence is enabled
    pub fn is_persistent(&self) -> bool {
        self.persistence_enabled && self.store.path().is_some()
    }

    pub fn data_file(&self) -> Option<&Path> {
        self.store.path()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        let coder_type = self.status_label();
        TrackerSnapshot {
            totals: self.current_totals(),
            coder_type,
            label: coder_type.label(),
            interval: self.interval,
            persistence_enabled: self.is_persistent(),
            data_file: self.store.path().map(Path::to_path_buf),
            last_updated: self.state.last_updated,
            shut_down: self.shut_down,
        }
    }

    fn open_interval(&mut self, mode: Mode) {
        let start = self.clock.now();
        debug!("Opening {:?} interval at {}", mode, start);
        self.interval = Some(OpenInterval { start, mode });
    }

    /// Take the open interval and add its elapsed time to its bucket
    fn close_interval(&mut self) -> Option<(Mode, f64)> {
        let open = self.interval.take()?;
        let elapsed = elapsed_seconds(open.start, self.clock.now());
        self.state.add(open.mode, elapsed);
        debug!("Closed {:?} interval after {:.3}s", open.mode, elapsed);
        Some((open.mode, elapsed))
    }

    fn close_and_persist(&mut self) {
        if self.close_interval().is_some() {
            self.persist();
        }
    }

    /// Write the totals if persistence is on. Failures are reported once
    /// until a write succeeds again; in-memory totals are unaffected.
    fn persist(&mut self) {
        if !self.persistence_enabled || self.store.path().is_none() {
            return;
        }

        let mut next = self.state;
        next.touch(self.clock.now());

        match self.store.save(&next) {
            Ok(()) => {
                self.state.last_updated = next.last_updated;
                if self.write_failing {
                    self.write_failing = false;
                    self.notifier.notify(Notice::info("Timer data is being saved again."));
                }
            }
            Err(e) => {
                warn!("Failed to persist timer data: {}", e);
                if !self.write_failing {
                    self.write_failing = true;
                    self.notifier.notify(Notice::error(format!(
                        "{}. Time is still tracked in memory.",
                        e
                    )));
                }
            }
        }
    }
}

impl std::fmt::Debug for TimeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeTracker")
            .field("state", &self.state)
            .field("interval", &self.interval)
            .field("store", &self.store)
            .field("persistence_enabled", &self.persistence_enabled)
            .field("shut_down", &self.shut_down)
            .finish_non_exhaustive()
    }
}
