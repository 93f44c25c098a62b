use async_trait::async_trait;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

/// A hook that can be refreshed on a timer.
#[async_trait]
pub trait Refresh: Clone + Send + Sync + 'static {
    /// Whether a fetch is currently outstanding
    fn is_fetching(&self) -> bool;

    /// Re-run the hook's current fetch
    async fn refresh(&self);

    /// Refresh every `period` until the returned handle is dropped
    fn poll(&self, period: Duration) -> PollHandle
    where
        Self: Sized,
    {
        PollHandle::spawn(self.clone(), period)
    }
}

/// Background refresh task. Dropping the handle stops it.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Refresh `target` every `period`, starting one period from now.
    ///
    /// Ticks that arrive while a fetch is in flight are skipped rather than
    /// queued.
    pub fn spawn<R: Refresh>(target: R, period: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticks.tick().await;
                if target.is_fetching() {
                    debug!("Skipping poll tick, fetch in flight");
                    continue;
                }
                target.refresh().await;
            }
        });

        Self { task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct Counter {
        refreshes: Arc<AtomicUsize>,
        busy: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Refresh for Counter {
        fn is_fetching(&self) -> bool {
            self.busy.load(Ordering::SeqCst)
        }

        async fn refresh(&self) {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_every_period() {
        let counter = Counter::default();
        let handle = PollHandle::spawn(counter.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(counter.refreshes.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(62)).await;
        assert_eq!(counter.refreshes.load(Ordering::SeqCst), 3);
        assert!(handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skips_ticks_while_fetching() {
        let counter = Counter::default();
        counter.busy.store(true, Ordering::SeqCst);
        let _handle = PollHandle::spawn(counter.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(counter.refreshes.load(Ordering::SeqCst), 0);

        counter.busy.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counter.refreshes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_polling() {
        let counter = Counter::default();
        let handle = PollHandle::spawn(counter.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(counter.refreshes.load(Ordering::SeqCst), 1);
    }
}
