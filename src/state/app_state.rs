//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use super::TimerState;
use crate::widget::{CookingTimer, TimerView};

/// Application state shared by all handlers: the mounted widget slot plus
/// server metadata
#[derive(Debug)]
pub struct AppState {
    /// The mounted cooking timer, `None` once unmounted
    pub widget: Arc<Mutex<Option<CookingTimer>>>,
    /// Tick period used for every widget mounted by this server
    pub tick_period: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState with a freshly mounted widget
    pub fn new(port: u16, host: String, tick_period: Duration) -> Self {
        Self {
            widget: Arc::new(Mutex::new(Some(CookingTimer::mount(tick_period)))),
            tick_period,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Run `action` against the mounted widget and record it as the last
    /// action. `Ok(None)` when no widget is mounted.
    pub fn with_widget<F, R>(&self, action: &str, f: F) -> Result<Option<R>, String>
    where
        F: FnOnce(&mut CookingTimer) -> R,
    {
        let mut widget = self.widget.lock()
            .map_err(|e| format!("Failed to lock widget: {}", e))?;

        let result = widget.as_mut().map(f);
        drop(widget); // Release the lock early

        if result.is_some() {
            self.record_action(action);
        }
        Ok(result)
    }

    /// Render the mounted widget
    pub fn render(&self) -> Result<Option<TimerView>, String> {
        self.widget.lock()
            .map(|widget| widget.as_ref().map(CookingTimer::render))
            .map_err(|e| format!("Failed to lock widget: {}", e))
    }

    /// Subscribe to timer updates of the mounted widget
    pub fn subscribe(&self) -> Result<Option<watch::Receiver<TimerState>>, String> {
        self.widget.lock()
            .map(|widget| widget.as_ref().map(CookingTimer::subscribe))
            .map_err(|e| format!("Failed to lock widget: {}", e))
    }

    pub fn is_mounted(&self) -> Result<bool, String> {
        self.widget.lock()
            .map(|widget| widget.is_some())
            .map_err(|e| format!("Failed to lock widget: {}", e))
    }

    /// Mount a fresh widget. Returns false if one is already mounted.
    pub fn mount_widget(&self) -> Result<bool, String> {
        let mut widget = self.widget.lock()
            .map_err(|e| format!("Failed to lock widget: {}", e))?;

        if widget.is_some() {
            warn!("Mount requested while a widget is already mounted");
            return Ok(false);
        }
        *widget = Some(CookingTimer::mount(self.tick_period));
        drop(widget);

        self.record_action("mount");
        Ok(true)
    }

    /// Unmount the widget, returning its final state. `Ok(None)` if nothing
    /// was mounted.
    pub fn unmount_widget(&self) -> Result<Option<TimerState>, String> {
        let taken = self.widget.lock()
            .map_err(|e| format!("Failed to lock widget: {}", e))?
            .take();

        let Some(widget) = taken else {
            return Ok(None);
        };
        let last = widget.unmount();

        self.record_action("unmount");
        Ok(Some(last))
    }

    fn record_action(&self, action: &str) {
        info!("Action: {}", action);
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_state() -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), Duration::from_secs(1))
    }

    #[test]
    fn starts_mounted_and_idle() {
        let state = app_state();
        assert!(state.is_mounted().unwrap());
        let view = state.render().unwrap().unwrap();
        assert_eq!(view.display, "00:00");
        assert_eq!(state.get_last_action(), (None, None));
    }

    #[test]
    fn with_widget_records_last_action() {
        let state = app_state();
        let applied = state.with_widget("reset", |w| w.press_reset()).unwrap();
        assert_eq!(applied, Some(None));

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("reset"));
        assert!(time.is_some());
    }

    #[test]
    fn unmount_then_mount_gives_fresh_widget() {
        let state = app_state();
        assert!(!state.mount_widget().unwrap());

        assert_eq!(state.unmount_widget().unwrap(), Some(TimerState::new()));
        assert!(!state.is_mounted().unwrap());
        assert!(state.render().unwrap().is_none());
        assert!(state.unmount_widget().unwrap().is_none());
        assert!(state.with_widget("toggle", |w| w.press_toggle()).unwrap().is_none());

        assert!(state.mount_widget().unwrap());
        assert!(state.is_mounted().unwrap());
        assert_eq!(state.get_last_action().0.as_deref(), Some("mount"));
    }

    #[test]
    fn uptime_starts_in_seconds() {
        assert!(app_state().get_uptime().ends_with('s'));
    }
}
