//! Fetch state shared by every hook.
//!
//! A [`Resource`] owns one [`FetchState`] and broadcasts changes over a
//! `watch` channel. Each fetch is issued a token; only the response carrying
//! the most recent token may settle the state.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// Lifecycle of one fetched value
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Nothing requested yet
    Idle,
    /// A request is outstanding; `previous` is the last loaded value, if any
    Loading { previous: Option<T> },
    Loaded(T),
    /// Display string for the failure
    Failed(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    /// Current value, or the one being refreshed
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(value) => Some(value),
            FetchState::Loading { previous } => previous.as_ref(),
            FetchState::Idle | FetchState::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Whether a settled response was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    /// A newer request was issued while this one was in flight
    Superseded,
}

struct Inner<T> {
    state: watch::Sender<FetchState<T>>,
    latest: AtomicU64,
    in_flight: AtomicUsize,
}

/// Cloneable handle over one fetch state
pub struct Resource<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Resource<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// One outstanding fetch.
///
/// Dropped without settling (the fetch future was cancelled), it rolls a
/// still-current `Loading` back to the previous value, or to `Idle`.
struct Pending<'a, T> {
    inner: &'a Inner<T>,
    token: u64,
    settled: bool,
}

impl<'a, T> Pending<'a, T> {
    fn enter(inner: &'a Inner<T>, token: u64) -> Self {
        inner.in_flight.fetch_add(1, Ordering::SeqCst);
        Self {
            inner,
            token,
            settled: false,
        }
    }
}

impl<T> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
        if !self.settled {
            self.inner.abandon(self.token);
        }
    }
}

impl<T> Inner<T> {
    fn abandon(&self, token: u64) {
        let restored = self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != token {
                return false;
            }
            let FetchState::Loading { previous } = state else {
                return false;
            };
            *state = match previous.take() {
                Some(value) => FetchState::Loaded(value),
                None => FetchState::Idle,
            };
            true
        });

        if restored {
            debug!(token, "Fetch cancelled, restored previous state");
        }
    }
}

impl<T> Resource<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            inner: Arc::new(Inner {
                state,
                latest: AtomicU64::new(0),
                in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FetchState<T> {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.inner.state.subscribe()
    }

    pub fn is_fetching(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Run `fetch` under a fresh token and settle the state with its result
    /// unless a newer fetch started meanwhile.
    pub async fn run<F>(&self, fetch: F) -> Settled
    where
        F: Future<Output = Result<T, String>>,
    {
        let token = self.begin();
        let mut pending = Pending::enter(&self.inner, token);
        let result = fetch.await;
        pending.settled = true;
        self.settle(token, result)
    }

    fn begin(&self) -> u64 {
        let token = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_modify(|state| {
            let previous = match std::mem::take(state) {
                FetchState::Loaded(value) => Some(value),
                FetchState::Loading { previous } => previous,
                FetchState::Idle | FetchState::Failed(_) => None,
            };
            *state = FetchState::Loading { previous };
        });
        token
    }

    fn settle(&self, token: u64, result: Result<T, String>) -> Settled {
        let mut settled = Settled::Superseded;
        // Compared under the channel lock so a newer `begin` cannot interleave.
        self.inner.state.send_if_modified(|state| {
            if self.inner.latest.load(Ordering::SeqCst) != token {
                return false;
            }
            *state = match result {
                Ok(value) => FetchState::Loaded(value),
                Err(message) => FetchState::Failed(message),
            };
            settled = Settled::Applied;
            true
        });

        if settled == Settled::Superseded {
            debug!(token, "Discarding superseded response");
        }
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_starts_idle() {
        let resource = Resource::<u32>::new();
        assert_eq!(resource.state(), FetchState::Idle);
        assert!(!resource.is_fetching());
    }

    #[tokio::test]
    async fn test_success_and_failure() {
        let resource = Resource::<u32>::new();

        assert_eq!(resource.run(async { Ok(7) }).await, Settled::Applied);
        assert_eq!(resource.state(), FetchState::Loaded(7));

        resource.run(async { Err("boom".to_string()) }).await;
        assert_eq!(resource.state().error(), Some("boom"));
        assert_eq!(resource.state().data(), None);
    }

    #[tokio::test]
    async fn test_loading_keeps_previous_value() {
        let resource = Resource::<u32>::new();
        resource.run(async { Ok(1) }).await;

        let mut rx = resource.subscribe();
        let watcher = resource.clone();
        let fetch = tokio::spawn(async move {
            watcher
                .run(async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok(2)
                })
                .await
        });

        rx.changed().await.unwrap();
        let loading = rx.borrow_and_update().clone();
        assert!(loading.is_loading());
        assert_eq!(loading.data(), Some(&1));
        assert!(resource.is_fetching());

        fetch.await.unwrap();
        assert_eq!(resource.state(), FetchState::Loaded(2));
        assert!(!resource.is_fetching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_response_is_discarded() {
        let resource = Resource::<&'static str>::new();

        let slow = resource.run(async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok("stale")
        });
        let fast = resource.run(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok("fresh")
        });

        let (slow, fast) = tokio::join!(slow, fast);
        assert_eq!(fast, Settled::Applied);
        assert_eq!(slow, Settled::Superseded);
        assert_eq!(resource.state(), FetchState::Loaded("fresh"));
    }

    #[tokio::test]
    async fn test_dropped_fetch_clears_in_flight() {
        let resource = Resource::<u32>::new();
        {
            let pending = resource.run(std::future::pending());
            tokio::pin!(pending);
            let _ = tokio::time::timeout(Duration::from_millis(5), &mut pending).await;
            assert!(resource.is_fetching());
        }
        assert!(!resource.is_fetching());
    }

    #[tokio::test]
    async fn test_cancelled_fetch_restores_previous_value() {
        let resource = Resource::<u32>::new();
        resource.run(async { Ok(1) }).await;
        {
            let pending = resource.run(std::future::pending());
            tokio::pin!(pending);
            let _ = tokio::time::timeout(Duration::from_millis(5), &mut pending).await;
            assert!(resource.state().is_loading());
        }
        assert_eq!(resource.state(), FetchState::Loaded(1));
    }

    #[tokio::test]
    async fn test_cancelled_first_fetch_returns_to_idle() {
        let resource = Resource::<u32>::new();
        {
            let pending = resource.run(std::future::pending());
            tokio::pin!(pending);
            let _ = tokio::time::timeout(Duration::from_millis(5), &mut pending).await;
        }
        assert_eq!(resource.state(), FetchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_older_fetch_leaves_newer_loading() {
        let resource = Resource::<u32>::new();
        let newer = resource.clone();

        let older = tokio::spawn({
            let resource = resource.clone();
            async move { resource.run(std::future::pending()).await }
        });
        tokio::task::yield_now().await;
        let fresh = tokio::spawn(async move {
            newer
                .run(async {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(2)
                })
                .await
        });
        tokio::task::yield_now().await;

        older.abort();
        let _ = older.await;
        assert!(resource.state().is_loading());

        assert_eq!(fresh.await.unwrap(), Settled::Applied);
        assert_eq!(resource.state(), FetchState::Loaded(2));
    }
}
