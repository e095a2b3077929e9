//! End-to-end tracker scenarios driven by a manual clock

use std::{path::PathBuf, sync::Arc};

use chrono::{TimeZone, Utc};
use project_time::{
    services::{FixedAnswer, NoticeBoard, PersistentStore},
    state::{CoderType, Mode, TimeTracker},
    utils::{Clock, ManualClock},
};
use tempfile::TempDir;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 9, 2, 9, 30, 0).unwrap(),
    ))
}

fn data_file(tmp: &TempDir) -> PathBuf {
    tmp.path().join(".vscode").join("timer-data.json")
}

fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}

#[test]
fn full_session_accounts_every_second_once() {
    let tmp = TempDir::new().unwrap();
    let clock = clock();
    let started = clock.now();
    let mut tracker = TimeTracker::new(
        Some(tmp.path()),
        &FixedAnswer(true),
        clock.clone(),
        Arc::new(NoticeBoard::new()),
    );

    clock.advance_secs(650);
    tracker.on_document_saved();
    tracker.on_focus_changed(false);
    clock.advance_secs(200);
    tracker.on_focus_changed(true);
    clock.advance_secs(50);
    tracker.on_shutdown();

    let totals = tracker.current_totals();
    assert!(approx(totals.active_seconds, 700.0), "active {}", totals.active_seconds);
    assert!(approx(totals.other_seconds, 200.0), "other {}", totals.other_seconds);

    // No double counting: both buckets add up to wall-clock time
    let wall = (clock.now() - started).num_milliseconds() as f64 / 1000.0;
    assert!(approx(totals.active_seconds + totals.other_seconds, wall));

    let stored = PersistentStore::at(data_file(&tmp)).load().unwrap();
    assert!(approx(stored.active_seconds, 700.0));
    assert!(approx(stored.other_seconds, 200.0));
    assert_eq!(stored.last_updated, clock.now());
    assert_eq!(tracker.status_label(), CoderType::JustGettingStarted);
}

#[test]
fn declined_initialization_never_creates_the_file() {
    let tmp = TempDir::new().unwrap();
    let clock = clock();
    let mut tracker = TimeTracker::new(
        Some(tmp.path()),
        &FixedAnswer(false),
        clock.clone(),
        Arc::new(NoticeBoard::new()),
    );

    for _ in 0..5 {
        clock.advance_secs(60);
        tracker.on_document_saved();
        tracker.on_focus_changed(false);
        clock.advance_secs(30);
        tracker.on_focus_changed(true);
    }
    tracker.on_shutdown();

    let totals = tracker.current_totals();
    assert!(approx(totals.active_seconds, 300.0));
    assert!(approx(totals.other_seconds, 150.0));
    assert!(!data_file(&tmp).exists());
}

#[test]
fn totals_and_last_updated_never_decrease() {
    let tmp = TempDir::new().unwrap();
    let clock = clock();
    let mut tracker = TimeTracker::new(
        Some(tmp.path()),
        &FixedAnswer(true),
        clock.clone(),
        Arc::new(NoticeBoard::new()),
    );

    // Out-of-order and repeated events, including a clock step backwards
    let steps: [(i64, u8); 10] = [
        (5, 0), (0, 0), (12, 1), (3, 1), (-40, 2),
        (7, 0), (9, 2), (0, 1), (30, 2), (1, 0),
    ];

    let mut previous = *tracker.state();
    for (secs, event) in steps {
        clock.advance_secs(secs);
        match event {
            0 => tracker.on_focus_changed(true),
            1 => tracker.on_focus_changed(false),
            _ => tracker.on_document_saved(),
        }

        let current = *tracker.state();
        assert!(current.active_seconds >= previous.active_seconds);
        assert!(current.other_seconds >= previous.other_seconds);
        assert!(current.last_updated >= previous.last_updated);
        assert!(tracker.open_interval_info().is_some());
        previous = current;
    }

    tracker.on_shutdown();
    assert!(tracker.open_interval_info().is_none());
}

#[test]
fn fresh_tracker_resumes_from_saved_totals() {
    let tmp = TempDir::new().unwrap();
    let clock = clock();

    let mut first = TimeTracker::new(
        Some(tmp.path()),
        &FixedAnswer(true),
        clock.clone(),
        Arc::new(NoticeBoard::new()),
    );
    clock.advance_secs(1_800);
    first.on_focus_changed(false);
    clock.advance_secs(60);
    first.on_shutdown();

    let mut second = TimeTracker::new(
        Some(tmp.path()),
        &FixedAnswer(false),
        clock.clone(),
        Arc::new(NoticeBoard::new()),
    );
    assert_eq!(second.current_totals(), first.current_totals());
    assert_eq!(second.status_label(), CoderType::InTheZone);
    assert_eq!(
        second.open_interval_info().map(|open| open.mode),
        Some(Mode::Active)
    );

    clock.advance_secs(600);
    second.on_shutdown();
    let stored = PersistentStore::at(data_file(&tmp)).load().unwrap();
    assert!(approx(stored.active_seconds, 2_400.0));
    assert!(approx(stored.other_seconds, 60.0));
}

#[test]
fn crash_loses_only_the_open_interval() {
    let tmp = TempDir::new().unwrap();
    let clock = clock();
    let mut tracker = TimeTracker::new(
        Some(tmp.path()),
        &FixedAnswer(true),
        clock.clone(),
        Arc::new(NoticeBoard::new()),
    );

    clock.advance_secs(300);
    tracker.on_document_saved();
    clock.advance_secs(120);
    // Process dies here without a shutdown flush
    drop(tracker);

    let stored = PersistentStore::at(data_file(&tmp)).load().unwrap();
    assert!(approx(stored.active_seconds, 300.0));
}
