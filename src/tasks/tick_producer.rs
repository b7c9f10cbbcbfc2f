//! Periodic tick producer task

use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::engine::SharedTimer;

/// Owned handle to a running tick producer.
///
/// Dropping the handle aborts the task, so a producer can never outlive
/// whatever holds it.
#[derive(Debug)]
pub struct TickProducer {
    handle: JoinHandle<()>,
    shared: Arc<SharedTimer>,
    generation: u64,
}

impl TickProducer {
    /// Register a producer that ticks every `period`, first one period from
    /// now. Must be called from within a tokio runtime.
    pub fn spawn(shared: Arc<SharedTimer>, generation: u64, period: Duration) -> Self {
        let first_tick = Instant::now() + period;
        shared.producer_registered();
        debug!("Registering tick producer (generation {}, period {:?})", generation, period);

        let handle = tokio::spawn(tick_producer_task(
            Arc::clone(&shared),
            generation,
            first_tick,
            period,
        ));

        Self {
            handle,
            shared,
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancel the producer. Equivalent to dropping the handle.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TickProducer {
    fn drop(&mut self) {
        self.handle.abort();
        self.shared.producer_released();
        debug!("Cleaning up tick producer (generation {})", self.generation);
    }
}

/// Background task that increments the shared timer once per period until
/// its generation goes stale or the task is aborted
pub async fn tick_producer_task(
    shared: Arc<SharedTimer>,
    generation: u64,
    first_tick: Instant,
    period: Duration,
) {
    let mut interval = interval_at(first_tick, period);
    // A late tick is delivered once, never as a burst
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match shared.apply_tick(generation) {
            Some(elapsed) => debug!("Timer tick: {}", elapsed),
            None => {
                debug!("Tick producer generation {} is stale, stopping", generation);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_a_full_period() {
        let shared = Arc::new(SharedTimer::new());
        let generation = shared.begin_run().unwrap();
        let _producer = TickProducer::spawn(Arc::clone(&shared), generation, Duration::from_secs(1));

        sleep(Duration::from_millis(900)).await;
        assert_eq!(shared.snapshot().elapsed_seconds, 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(shared.snapshot().elapsed_seconds, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_ticks() {
        let shared = Arc::new(SharedTimer::new());
        let generation = shared.begin_run().unwrap();
        let producer = TickProducer::spawn(Arc::clone(&shared), generation, Duration::from_secs(1));
        assert_eq!(shared.live_producers(), 1);

        sleep(Duration::from_millis(2500)).await;
        assert_eq!(shared.snapshot().elapsed_seconds, 2);

        // state still says running, only the handle is gone
        producer.cancel();
        assert_eq!(shared.live_producers(), 0);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(shared.snapshot().elapsed_seconds, 2);
        assert!(shared.snapshot().running);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_exits_on_its_own() {
        let shared = Arc::new(SharedTimer::new());
        let generation = shared.begin_run().unwrap();
        let producer = TickProducer::spawn(Arc::clone(&shared), generation, Duration::from_secs(1));

        shared.stop();
        sleep(Duration::from_millis(1500)).await;
        assert!(producer.handle.is_finished());
        assert_eq!(shared.snapshot().elapsed_seconds, 0);
    }
}
