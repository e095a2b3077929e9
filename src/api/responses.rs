//! API request and response structures

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::Notice,
    state::{format_time_spent, CoderType, OpenInterval, Totals, TrackerSnapshot},
};

/// Body of POST /focus
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FocusRequest {
    pub focused: bool,
}

/// Response for event endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub totals: Totals,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, totals: Totals) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            totals,
        }
    }

    /// Response for an event the tracker acted on, or `stopped` once the
    /// tracker has shut down and ignores events
    pub fn from_snapshot(message: &str, snapshot: &TrackerSnapshot) -> Self {
        if snapshot.shut_down {
            Self::new(
                "stopped".to_string(),
                "Tracker has shut down".to_string(),
                snapshot.totals,
            )
        } else {
            Self::new(
                "tracking".to_string(),
                message.to_string(),
                snapshot.totals,
            )
        }
    }

    /// Response for the shutdown endpoint
    pub fn stopped(message: String, totals: Totals) -> Self {
        Self::new("stopped".to_string(), message, totals)
    }
}

/// Status response with tracker details
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub totals: Totals,
    pub coder_type: CoderType,
    pub status_label: String,
    pub interval: Option<OpenInterval>,
    pub persistence_enabled: bool,
    pub data_file: Option<PathBuf>,
    pub last_updated: DateTime<Utc>,
    pub shut_down: bool,
    pub notices: Vec<Notice>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// "Show time spent" summary of active time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSpentResponse {
    pub hours: u64,
    pub minutes: u64,
    pub message: String,
    pub status_label: String,
}

impl TimeSpentResponse {
    pub fn from_active_seconds(seconds: f64) -> Self {
        let whole = if seconds.is_finite() && seconds > 0.0 {
            seconds.floor() as u64
        } else {
            0
        };
        Self {
            hours: whole / 3600,
            minutes: (whole % 3600) / 60,
            message: format!("Total time spent: {}", format_time_spent(seconds)),
            status_label: CoderType::from_active_seconds(seconds).label().to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_spent_summary() {
        let response = TimeSpentResponse::from_active_seconds(2.0 * 3600.0 + 7.0 * 60.0 + 59.0);
        assert_eq!(response.hours, 2);
        assert_eq!(response.minutes, 7);
        assert_eq!(response.message, "Total time spent: 02:07");
        assert_eq!(response.status_label, "Coding Warrior");
    }
}
