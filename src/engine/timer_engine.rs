//! Start/pause/reset timer engine

use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    state::{timer_state::format_elapsed, TimerPhase, TimerState},
    tasks::TickProducer,
};

use super::SharedTimer;

/// Nominal tick period of a cooking timer
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Elapsed-time timer driven by a periodic tick producer.
///
/// The engine holds at most one [`TickProducer`], registered exactly while
/// the timer is running. Every transition out of the running state cancels
/// the producer before returning, and dropping the engine cancels it as
/// well, so no tick ever lands after `pause`, `reset` or teardown.
///
/// `start` (and `toggle` into the running state) spawns onto the current
/// tokio runtime.
#[derive(Debug)]
pub struct TimerEngine {
    shared: Arc<SharedTimer>,
    producer: Option<TickProducer>,
    period: Duration,
}

impl TimerEngine {
    /// Create an idle engine at 00:00 ticking every `period` once started
    pub fn new(period: Duration) -> Self {
        Self {
            shared: Arc::new(SharedTimer::new()),
            producer: None,
            period,
        }
    }

    /// Start ticking. Returns false if the timer was already running.
    pub fn start(&mut self) -> bool {
        let Some(generation) = self.shared.begin_run() else {
            debug!("Start requested while already running");
            return false;
        };

        // Never two producers at once
        if let Some(previous) = self.producer.take() {
            previous.cancel();
        }
        self.producer = Some(TickProducer::spawn(
            Arc::clone(&self.shared),
            generation,
            self.period,
        ));

        info!("Timer started at {}", self.format_elapsed());
        true
    }

    /// Stop ticking. Returns false if the timer was already paused.
    pub fn pause(&mut self) -> bool {
        if !self.shared.stop() {
            debug!("Pause requested while already paused");
            return false;
        }
        self.cancel_producer();

        info!("Timer paused at {}", self.format_elapsed());
        true
    }

    /// Pause if running, otherwise start. Returns the phase afterwards.
    pub fn toggle(&mut self) -> TimerPhase {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
        self.phase()
    }

    /// Clear elapsed time, pausing first if running.
    ///
    /// Returns false when there was nothing to do (idle at 00:00).
    pub fn reset(&mut self) -> bool {
        let Some(was_running) = self.shared.clear() else {
            debug!("Reset requested on a pristine timer");
            return false;
        };
        if was_running {
            self.cancel_producer();
        }

        info!("Timer reset (was {})", if was_running { "running" } else { "paused" });
        true
    }

    /// Whether a reset control should be offered: there is elapsed time to
    /// clear.
    pub fn can_reset(&self) -> bool {
        self.elapsed_seconds() != 0
    }

    /// Elapsed time as `MM:SS`
    pub fn format_elapsed(&self) -> String {
        format_elapsed(self.elapsed_seconds())
    }

    pub fn snapshot(&self) -> TimerState {
        self.shared.snapshot()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.snapshot().elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.snapshot().running
    }

    pub fn phase(&self) -> TimerPhase {
        self.snapshot().phase()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Watch every state change. The channel closes once the engine and its
    /// producer are gone.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.subscribe()
    }

    /// Number of registered tick producers, 0 or 1
    pub fn live_producers(&self) -> usize {
        self.shared.live_producers()
    }

    fn cancel_producer(&mut self) {
        if let Some(producer) = self.producer.take() {
            producer.cancel();
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        if self.shared.retire() {
            debug!("Tearing down running timer at {}", self.format_elapsed());
        }
        self.cancel_producer();
    }
}
