//! Timer engine module
//!
//! The start/pause/reset state machine and the shared state its tick
//! producer increments.

pub mod shared;
pub mod timer_engine;

// Re-export main types
pub use shared::SharedTimer;
pub use timer_engine::{TimerEngine, DEFAULT_TICK_PERIOD};
