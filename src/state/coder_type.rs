//! Coder status classification derived from active time

use serde::{Deserialize, Serialize};

/// Motivational tier for a given amount of active time, ordered from
/// lowest to highest. The ordering of variants is the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoderType {
    NotStarted,
    JustGettingStarted,
    WarmingUp,
    InTheZone,
    Focused,
    CodingWarrior,
    CodeNinja,
    CodingMachine,
    CodingGodMode,
}

/// Minimum whole minutes of active time for each tier, ascending.
const THRESHOLDS: [(u64, CoderType); 9] = [
    (0, CoderType::NotStarted),
    (1, CoderType::JustGettingStarted),
    (15, CoderType::WarmingUp),
    (30, CoderType::InTheZone),
    (60, CoderType::Focused),
    (120, CoderType::CodingWarrior),
    (240, CoderType::CodeNinja),
    (480, CoderType::CodingMachine),
    (1000, CoderType::CodingGodMode),
];

impl CoderType {
    /// Classify whole minutes of active time
    pub fn from_minutes(minutes: u64) -> Self {
        THRESHOLDS
            .iter()
            .rev()
            .find(|(min, _)| minutes >= *min)
            .map(|(_, tier)| *tier)
            .unwrap_or(CoderType::NotStarted)
    }

    /// Classify active seconds, truncated to whole minutes
    pub fn from_active_seconds(seconds: f64) -> Self {
        let minutes = if seconds.is_finite() && seconds > 0.0 {
            (seconds / 60.0).floor() as u64
        } else {
            0
        };
        Self::from_minutes(minutes)
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            CoderType::NotStarted => "Not Started",
            CoderType::JustGettingStarted => "Just Getting Started",
            CoderType::WarmingUp => "Warming Up",
            CoderType::InTheZone => "In the Zone",
            CoderType::Focused => "Focused",
            CoderType::CodingWarrior => "Coding Warrior",
            CoderType::CodeNinja => "Code Ninja",
            CoderType::CodingMachine => "Coding Machine",
            CoderType::CodingGodMode => "Coding God Mode",
        }
    }

    /// Minutes of active time at which this tier begins
    pub fn min_minutes(&self) -> u64 {
        THRESHOLDS
            .iter()
            .find(|(_, tier)| tier == self)
            .map(|(min, _)| *min)
            .unwrap_or(0)
    }
}

impl std::fmt::Display for CoderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Format active seconds as the "show time spent" summary, `HH:MM`
pub fn format_time_spent(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 3600, (total % 3600) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_started() {
        assert_eq!(CoderType::from_active_seconds(0.0), CoderType::NotStarted);
        assert_eq!(CoderType::from_active_seconds(59.9), CoderType::NotStarted);
    }

    #[test]
    fn boundaries_land_in_the_upper_tier() {
        assert_eq!(CoderType::from_minutes(1), CoderType::JustGettingStarted);
        assert_eq!(CoderType::from_minutes(14), CoderType::JustGettingStarted);
        assert_eq!(CoderType::from_minutes(30), CoderType::InTheZone);
        assert_eq!(CoderType::from_minutes(120), CoderType::CodingWarrior);
        assert_eq!(CoderType::from_minutes(999), CoderType::CodingMachine);
        assert_eq!(CoderType::from_minutes(1000), CoderType::CodingGodMode);
        assert_eq!(CoderType::from_minutes(u64::MAX), CoderType::CodingGodMode);
    }

    #[test]
    fn classification_is_monotone() {
        let mut previous = CoderType::NotStarted;
        for minutes in 0..2000 {
            let tier = CoderType::from_minutes(minutes);
            assert!(
                tier >= previous,
                "{} minutes ranked below {} minutes",
                minutes,
                minutes.saturating_sub(1)
            );
            previous = tier;
        }
    }

    #[test]
    fn thresholds_match_their_tier() {
        for (min, tier) in THRESHOLDS {
            assert_eq!(tier.min_minutes(), min);
            assert_eq!(CoderType::from_minutes(min), tier);
        }
    }

    #[test]
    fn negative_seconds_count_as_zero() {
        assert_eq!(CoderType::from_active_seconds(-100.0), CoderType::NotStarted);
    }

    #[test]
    fn formats_hours_and_minutes() {
        assert_eq!(format_time_spent(0.0), "00:00");
        assert_eq!(format_time_spent(3_900.0), "01:05");
        assert_eq!(format_time_spent(59.0), "00:00");
        assert_eq!(format_time_spent(36_000.0 * 10.0), "100:00");
    }
}
