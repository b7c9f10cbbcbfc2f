//! State shared between a timer engine and its tick producer

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, MutexGuard, PoisonError,
};
use tokio::sync::watch;

use crate::state::TimerState;

#[derive(Debug)]
struct TimerCell {
    state: TimerState,
    /// Bumped whenever a producer is registered or cancelled
    generation: u64,
}

/// Timer state guarded for read-modify-write from the tick producer task.
///
/// Every transition happens under one lock, and every transition into or
/// out of the running state bumps the producer generation. A tick carries
/// the generation it was registered with and is discarded if that
/// generation is no longer current, so a producer caught mid-wakeup by a
/// cancellation can never touch the state.
#[derive(Debug)]
pub struct SharedTimer {
    cell: Mutex<TimerCell>,
    updates: watch::Sender<TimerState>,
    live_producers: AtomicUsize,
}

impl SharedTimer {
    pub fn new() -> Self {
        let (updates, _) = watch::channel(TimerState::new());
        Self {
            cell: Mutex::new(TimerCell {
                state: TimerState::new(),
                generation: 0,
            }),
            updates,
            live_producers: AtomicUsize::new(0),
        }
    }

    // The cell is two plain values that no transition leaves half-written,
    // so a poisoned lock still guards a consistent state.
    fn lock(&self) -> MutexGuard<'_, TimerCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: TimerState) {
        // send_replace keeps the value current even with no subscribers
        self.updates.send_replace(state);
    }

    pub fn snapshot(&self) -> TimerState {
        self.lock().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.updates.subscribe()
    }

    /// Enter the running state, returning the generation for the new producer.
    /// `None` when already running.
    pub fn begin_run(&self) -> Option<u64> {
        let mut cell = self.lock();
        if cell.state.running {
            return None;
        }
        cell.state.running = true;
        cell.generation += 1;
        let generation = cell.generation;
        let snapshot = cell.state.clone();
        drop(cell);

        self.publish(snapshot);
        Some(generation)
    }

    /// Leave the running state. Returns false when already stopped.
    pub fn stop(&self) -> bool {
        let mut cell = self.lock();
        if !cell.state.running {
            return false;
        }
        cell.state.running = false;
        cell.generation += 1;
        let snapshot = cell.state.clone();
        drop(cell);

        self.publish(snapshot);
        true
    }

    /// Clear elapsed time and stop. Returns `None` when there was nothing to
    /// clear, otherwise whether the timer had been running.
    pub fn clear(&self) -> Option<bool> {
        let mut cell = self.lock();
        if cell.state.is_pristine() {
            return None;
        }
        let was_running = cell.state.running;
        cell.state = TimerState::new();
        cell.generation += 1;
        let snapshot = cell.state.clone();
        drop(cell);

        self.publish(snapshot);
        Some(was_running)
    }

    /// Invalidate any producer ahead of teardown without notifying
    /// subscribers. Returns whether the timer had been running.
    pub fn retire(&self) -> bool {
        let mut cell = self.lock();
        let was_running = cell.state.running;
        cell.state.running = false;
        cell.generation += 1;
        was_running
    }

    /// Increment elapsed time by one period on behalf of the producer with
    /// `generation`. Returns the new elapsed count, or `None` if that
    /// producer has been cancelled.
    pub fn apply_tick(&self, generation: u64) -> Option<u64> {
        let mut cell = self.lock();
        if !cell.state.running || cell.generation != generation {
            return None;
        }
        cell.state.elapsed_seconds = cell.state.elapsed_seconds.saturating_add(1);
        let snapshot = cell.state.clone();
        drop(cell);

        let elapsed = snapshot.elapsed_seconds;
        self.publish(snapshot);
        Some(elapsed)
    }

    pub(crate) fn producer_registered(&self) {
        self.live_producers.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn producer_released(&self) {
        self.live_producers.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn live_producers(&self) -> usize {
        self.live_producers.load(Ordering::SeqCst)
    }
}

impl Default for SharedTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_count_for_the_current_generation() {
        let shared = SharedTimer::new();

        let first = shared.begin_run().unwrap();
        assert_eq!(shared.apply_tick(first), Some(1));
        assert!(shared.stop());
        assert_eq!(shared.apply_tick(first), None);

        let second = shared.begin_run().unwrap();
        assert_ne!(first, second);
        assert_eq!(shared.apply_tick(first), None);
        assert_eq!(shared.apply_tick(second), Some(2));
    }

    #[test]
    fn begin_run_twice_is_rejected() {
        let shared = SharedTimer::new();
        assert!(shared.begin_run().is_some());
        assert!(shared.begin_run().is_none());
    }

    #[test]
    fn clear_reports_prior_phase() {
        let shared = SharedTimer::new();
        assert_eq!(shared.clear(), None);

        let generation = shared.begin_run().unwrap();
        shared.apply_tick(generation);
        assert_eq!(shared.clear(), Some(true));
        assert_eq!(shared.snapshot(), TimerState::new());
        assert_eq!(shared.apply_tick(generation), None);
    }

    #[test]
    fn retire_invalidates_without_publishing() {
        let shared = SharedTimer::new();
        let generation = shared.begin_run().unwrap();
        let mut rx = shared.subscribe();
        rx.borrow_and_update();

        assert!(shared.retire());
        assert_eq!(shared.apply_tick(generation), None);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn subscribers_see_transitions() {
        let shared = SharedTimer::new();
        let rx = shared.subscribe();
        let generation = shared.begin_run().unwrap();
        shared.apply_tick(generation);
        assert_eq!(
            *rx.borrow(),
            TimerState {
                elapsed_seconds: 1,
                running: true
            }
        );
    }
}
