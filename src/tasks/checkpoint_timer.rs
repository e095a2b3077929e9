//! Periodic checkpoint background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that checkpoints the running interval every
/// `state.checkpoint_interval_minutes`, so a crash loses at most one period
/// even when nothing is being saved. Returns immediately when disabled, and
/// exits once the tracker has shut down.
pub async fn checkpoint_timer_task(state: Arc<AppState>) {
    if state.checkpoint_interval_minutes == 0 {
        info!("Periodic checkpoints disabled");
        return;
    }

    let period = Duration::from_secs(state.checkpoint_interval_minutes * 60);
    info!("Starting checkpoint timer task, every {} minutes", state.checkpoint_interval_minutes);

    run_checkpoints(state, period).await;
}

async fn run_checkpoints(state: Arc<AppState>, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the interval was just opened
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match state.checkpoint() {
            Ok(snapshot) if snapshot.shut_down => {
                debug!("Tracker shut down, stopping checkpoint timer");
                break;
            }
            Ok(snapshot) => {
                debug!(
                    "Checkpoint: {:.0}s active, {:.0}s other",
                    snapshot.totals.active_seconds, snapshot.totals.other_seconds
                );
            }
            Err(e) => {
                error!("Checkpoint failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::FixedAnswer, utils::ManualClock};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn test_state(tmp: &TempDir, clock: Arc<ManualClock>, minutes: u64) -> Arc<AppState> {
        Arc::new(AppState::new(
            Some(tmp.path()),
            &FixedAnswer(true),
            clock,
            0,
            "127.0.0.1".to_string(),
            minutes,
        ))
    }

    #[tokio::test]
    async fn disabled_task_returns_immediately() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let state = test_state(&tmp, clock, 0);
        checkpoint_timer_task(state).await;
    }

    #[tokio::test(start_paused = true)]
    async fn checkpoints_until_shutdown() {
        let tmp = TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()));
        let state = test_state(&tmp, clock.clone(), 1);

        let task = tokio::spawn(run_checkpoints(Arc::clone(&state), Duration::from_secs(60)));

        clock.advance_secs(60);
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(state.get_snapshot().unwrap().totals.active_seconds, 60.0);

        state.shutdown().unwrap();
        tokio::time::sleep(Duration::from_secs(61)).await;
        task.await.expect("checkpoint task should finish after shutdown");
    }
}
