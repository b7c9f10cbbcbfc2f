//! State management module
//!
//! This module contains the timer state and the application state that
//! owns the mounted widget.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{format_elapsed, TimerPhase, TimerState};
