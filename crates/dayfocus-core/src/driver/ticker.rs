//! Periodic tick source.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Handle to a spawned task that sends its generation number once per
/// period. Dropping the handle aborts the task, so at most one tick source
/// exists per handle and none outlives it.
#[derive(Debug)]
pub struct Ticker {
    generation: u64,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Spawn onto the current tokio runtime. The first tick fires one full
    /// `period` after this call.
    pub fn spawn(period: Duration, generation: u64, ticks: mpsc::Sender<u64>) -> Self {
        let first = Instant::now() + period;
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(generation).await.is_err() {
                    break;
                }
            }
        });
        tracing::debug!(generation, period_ms = period.as_millis() as u64, "ticker installed");
        Self { generation, task }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!(generation = self.generation, "ticker released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sends_generation_each_period() {
        let (tx, mut rx) = mpsc::channel(8);
        let ticker = Ticker::spawn(Duration::from_secs(1), 7, tx);
        assert_eq!(ticker.generation(), 7);

        time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(rx.try_recv().unwrap(), 7);
        assert_eq!(rx.try_recv().unwrap(), 7);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_ticks() {
        let (tx, mut rx) = mpsc::channel(8);
        let ticker = Ticker::spawn(Duration::from_secs(1), 1, tx);
        time::sleep(Duration::from_millis(1500)).await;
        drop(ticker);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(rx.try_recv().unwrap(), 1);
        assert!(rx.try_recv().is_err());
    }
}
