//! Rendered view of the cooking timer

use serde::{Deserialize, Serialize};

use crate::state::{TimerPhase, TimerState};

pub const TITLE: &str = "🍳 Cooking Timer";
pub const START_LABEL: &str = "▶️ Start";
pub const PAUSE_LABEL: &str = "⏸️ Pause";
pub const RESET_LABEL: &str = "🔄 Reset";

/// A button as the widget presents it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlView {
    pub label: String,
    pub enabled: bool,
}

/// Everything the widget shows: the time display plus its two controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    pub title: String,
    /// Elapsed time as `MM:SS`
    pub display: String,
    pub elapsed_seconds: u64,
    pub running: bool,
    pub phase: TimerPhase,
    pub toggle: ControlView,
    pub reset: ControlView,
}

impl TimerView {
    pub fn from_state(state: &TimerState) -> Self {
        let toggle_label = match state.phase() {
            TimerPhase::Idle => START_LABEL,
            TimerPhase::Active => PAUSE_LABEL,
        };

        Self {
            title: TITLE.to_string(),
            display: state.formatted(),
            elapsed_seconds: state.elapsed_seconds,
            running: state.running,
            phase: state.phase(),
            toggle: ControlView {
                label: toggle_label.to_string(),
                enabled: true,
            },
            reset: ControlView {
                label: RESET_LABEL.to_string(),
                enabled: state.elapsed_seconds != 0,
            },
        }
    }
}

impl From<&TimerState> for TimerView {
    fn from(state: &TimerState) -> Self {
        Self::from_state(state)
    }
}
