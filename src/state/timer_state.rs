//! Timer state structure and management

use serde::{Deserialize, Serialize};

/// The two phases of the timer state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// Not running, no tick producer registered
    Idle,
    /// Running, exactly one tick producer registered
    Active,
}

/// Elapsed time and run flag of a cooking timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Whole tick periods accumulated while running
    pub elapsed_seconds: u64,
    pub running: bool,
}

impl TimerState {
    /// Create a new idle timer state at 00:00
    pub fn new() -> Self {
        Self {
            elapsed_seconds: 0,
            running: false,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Active
        } else {
            TimerPhase::Idle
        }
    }

    /// Check if there is anything for a reset to clear
    pub fn is_pristine(&self) -> bool {
        self.elapsed_seconds == 0 && !self.running
    }

    /// Elapsed time as `MM:SS`
    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number of seconds as `MM:SS`.
///
/// Minutes are not wrapped at 60, so an hour reads `60:00`.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        let cases = [
            (0, "00:00"),
            (5, "00:05"),
            (65, "01:05"),
            (125, "02:05"),
            (3599, "59:59"),
            (3600, "60:00"),
        ];
        for (seconds, expected) in cases {
            assert_eq!(format_elapsed(seconds), expected, "{seconds} seconds");
        }
    }

    #[test]
    fn minutes_grow_past_two_digits() {
        assert_eq!(format_elapsed(100 * 60 + 7), "100:07");
    }

    #[test]
    fn new_state_is_idle_at_zero() {
        let state = TimerState::new();
        assert_eq!(state.phase(), TimerPhase::Idle);
        assert_eq!(state.formatted(), "00:00");
        assert!(state.is_pristine());
    }

    #[test]
    fn running_state_is_active_and_not_pristine() {
        let state = TimerState {
            elapsed_seconds: 0,
            running: true,
        };
        assert_eq!(state.phase(), TimerPhase::Active);
        assert!(!state.is_pristine());
    }

    #[test]
    fn phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TimerPhase::Active).unwrap(), "\"active\"");
        assert_eq!(serde_json::to_string(&TimerPhase::Idle).unwrap(), "\"idle\"");
    }
}
