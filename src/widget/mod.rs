//! Widget module
//!
//! The cooking timer widget and the view it renders.

pub mod cooking_timer;
pub mod view;

// Re-export main types
pub use cooking_timer::CookingTimer;
pub use view::{ControlView, TimerView};
