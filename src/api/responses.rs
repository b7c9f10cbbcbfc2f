//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerPhase;
use crate::widget::TimerView;

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerView) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response whose status reflects the timer's phase
    pub fn for_phase(message: String, timer: TimerView) -> Self {
        let status = match timer.phase {
            TimerPhase::Active => "active",
            TimerPhase::Idle => "idle",
        };
        Self::new(status.to_string(), message, timer)
    }

    /// Create a response for a control that is currently disabled
    pub fn unavailable(message: String, timer: TimerView) -> Self {
        Self::new("unavailable".to_string(), message, timer)
    }
}

/// Response for widget mount/unmount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetResponse {
    pub mounted: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Current view after mounting, or `None` after unmounting
    pub timer: Option<TimerView>,
}

impl WidgetResponse {
    pub fn new(mounted: bool, message: String, timer: Option<TimerView>) -> Self {
        Self {
            mounted,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Status response with widget and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub mounted: bool,
    pub timer: Option<TimerView>,
    pub tick_period_ms: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
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
