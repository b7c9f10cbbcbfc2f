//! Cooking Timer - a start/pause/reset stopwatch widget served over HTTP
//!
//! This library provides the timer engine and its tick producer, the
//! cooking timer widget built on top of it, and the HTTP surface that
//! exposes the widget's controls.

pub mod config;
pub mod engine;
pub mod state;
pub mod widget;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::TimerEngine;
pub use state::{AppState, TimerPhase, TimerState};
pub use widget::{CookingTimer, TimerView};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
