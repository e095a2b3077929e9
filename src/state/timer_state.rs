//! Timer state structure and bucket accounting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which bucket an open interval accrues to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The editor window holds focus
    Active,
    /// Focus is somewhere else
    Other,
}

/// Accumulated totals for a project. This is what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerState {
    pub active_seconds: f64,
    pub other_seconds: f64,
    /// Wall-clock time of the last successful save
    pub last_updated: DateTime<Utc>,
}

impl TimerState {
    /// A fresh zero-state record
    pub fn new() -> Self {
        Self {
            active_seconds: 0.0,
            other_seconds: 0.0,
            last_updated: DateTime::<Utc>::default(),
        }
    }

    /// Add elapsed seconds to the bucket for `mode`. Negative or non-finite
    /// amounts are ignored so the totals never decrease.
    pub fn add(&mut self, mode: Mode, seconds: f64) {
        if !seconds.is_finite() || seconds <= 0.0 {
            return;
        }
        match mode {
            Mode::Active => self.active_seconds += seconds,
            Mode::Other => self.other_seconds += seconds,
        }
    }

    /// Advance `last_updated`, never moving it backwards
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_updated {
            self.last_updated = now;
        }
    }

    pub fn totals(&self) -> Totals {
        Totals {
            active_seconds: self.active_seconds,
            other_seconds: self.other_seconds,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only snapshot of both buckets
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub active_seconds: f64,
    pub other_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn add_goes_to_the_right_bucket() {
        let mut state = TimerState::new();
        state.add(Mode::Active, 30.0);
        state.add(Mode::Other, 12.5);
        state.add(Mode::Active, 0.5);

        assert_eq!(state.active_seconds, 30.5);
        assert_eq!(state.other_seconds, 12.5);
    }

    #[test]
    fn add_ignores_negative_and_nan() {
        let mut state = TimerState::new();
        state.add(Mode::Active, -5.0);
        state.add(Mode::Other, f64::NAN);
        assert_eq!(state.totals(), Totals::default());
    }

    #[test]
    fn touch_never_moves_backwards() {
        let mut state = TimerState::new();
        let now = Utc::now();
        state.touch(now);
        state.touch(now - Duration::minutes(5));
        assert_eq!(state.last_updated, now);
    }
}
