//! Cooking timer widget lifecycle

use std::time::Duration;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

use crate::{engine::TimerEngine, state::TimerState};
use super::TimerView;

/// A mounted cooking timer. Unmounting (or dropping) it tears down the
/// engine and cancels any live tick producer.
#[derive(Debug)]
pub struct CookingTimer {
    engine: TimerEngine,
    mounted_at: DateTime<Utc>,
}

impl CookingTimer {
    /// Mount a new widget, idle at 00:00
    pub fn mount(period: Duration) -> Self {
        info!("Cooking timer mounted (tick period {:?})", period);
        Self {
            engine: TimerEngine::new(period),
            mounted_at: Utc::now(),
        }
    }

    pub fn render(&self) -> TimerView {
        TimerView::from_state(&self.engine.snapshot())
    }

    /// Handle a press of the start/pause control
    pub fn press_toggle(&mut self) -> TimerView {
        self.engine.toggle();
        self.render()
    }

    /// Handle a press of the reset control. `None` while the control is
    /// disabled; nothing changes in that case.
    pub fn press_reset(&mut self) -> Option<TimerView> {
        if !self.engine.can_reset() {
            return None;
        }
        self.engine.reset();
        Some(self.render())
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TimerEngine {
        &mut self.engine
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.engine.subscribe()
    }

    pub fn mounted_at(&self) -> DateTime<Utc> {
        self.mounted_at
    }

    /// Tear the widget down, returning its final state
    pub fn unmount(self) -> TimerState {
        let last = self.engine.snapshot();
        info!(
            "Cooking timer unmounted at {} ({})",
            last.formatted(),
            if last.running { "stopping running timer" } else { "idle" }
        );
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    use crate::widget::view::{PAUSE_LABEL, START_LABEL};

    #[tokio::test(start_paused = true)]
    async fn toggle_control_label_follows_phase() {
        let mut widget = CookingTimer::mount(Duration::from_secs(1));
        assert_eq!(widget.render().toggle.label, START_LABEL);

        let view = widget.press_toggle();
        assert_eq!(view.toggle.label, PAUSE_LABEL);

        sleep(Duration::from_millis(1500)).await;
        let view = widget.press_toggle();
        assert_eq!(view.toggle.label, START_LABEL);
        assert_eq!(view.display, "00:01");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_control_disabled_at_zero() {
        let mut widget = CookingTimer::mount(Duration::from_secs(1));
        assert!(widget.press_reset().is_none());

        // running but nothing elapsed yet: still disabled, keeps running
        widget.press_toggle();
        assert!(widget.press_reset().is_none());
        assert!(widget.engine().is_running());

        sleep(Duration::from_millis(1500)).await;
        let view = widget.press_reset().unwrap();
        assert_eq!(view.display, "00:00");
        assert!(!view.running);
        assert!(!view.reset.enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_while_running_stops_ticks() {
        let mut widget = CookingTimer::mount(Duration::from_secs(1));
        let rx = widget.subscribe();
        widget.press_toggle();
        sleep(Duration::from_millis(1500)).await;

        let last = widget.unmount();
        assert_eq!(last.elapsed_seconds, 1);
        assert!(last.running);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(rx.borrow().elapsed_seconds, 1);
        assert!(rx.has_changed().is_err());
    }
}
