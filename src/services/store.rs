//! Reactive state holder shared by every store
//!
//! A [`Store`] owns a state value and publishes every change through a
//! `tokio::sync::watch` channel. Observers either take a [`Store::snapshot`]
//! or [`Store::subscribe`] to be woken on change. Every mutation is one
//! `send_modify` call, so readers never see a half-applied update.
//!
//! Operations follow one shape:
//! idle -> busy (error cleared) -> success (data replaced) | failure (error set)
//! and busy is cleared on both exits. There is no in-flight guard: two
//! overlapping operations both run and the later one to finish wins. Dropping
//! an operation's future before it completes leaves busy set.

use std::fmt::Display;
use std::time::Duration;
use tokio::sync::watch;

/// Busy flag and last error of a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStatus {
    pub is_loading: bool,
    pub error: Option<String>,
}

impl OperationStatus {
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self) {
        self.is_loading = false;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
    }
}

/// State types that carry an [`OperationStatus`]
pub trait HasStatus {
    fn status(&self) -> &OperationStatus;
    fn status_mut(&mut self) -> &mut OperationStatus;
}

/// Watch-channel backed state holder
#[derive(Debug)]
pub struct Store<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone + Send + Sync + 'static> Store<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Read the current state without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver notified on every change
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Apply one atomic change and notify observers
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut out = None;
        self.tx.send_modify(|state| out = Some(f(state)));
        out.expect("send_modify runs its closure exactly once")
    }
}

impl<S: HasStatus + Clone + Send + Sync + 'static> Store<S> {
    /// Enter busy and clear any previous error
    pub fn begin(&self) {
        self.update(|s| s.status_mut().begin());
    }

    /// Leave busy with `error` set
    pub fn fail(&self, error: impl Display) {
        let message = error.to_string();
        self.update(|s| s.status_mut().fail(message));
    }

    pub fn is_loading(&self) -> bool {
        self.read(|s| s.status().is_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.status().error.clone())
    }
}

/// Simulated network latency of one operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latency(Duration);

impl Latency {
    pub const NONE: Latency = Latency(Duration::ZERO);

    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub fn duration(self) -> Duration {
        self.0
    }

    /// Suspend for the configured delay. Zero latency does not yield.
    pub async fn wait(self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Counter {
        value: u32,
        status: OperationStatus,
    }

    impl HasStatus for Counter {
        fn status(&self) -> &OperationStatus {
            &self.status
        }
        fn status_mut(&mut self) -> &mut OperationStatus {
            &mut self.status
        }
    }

    #[test]
    fn test_begin_clears_error() {
        let store = Store::new(Counter::default());
        store.fail("boom");
        assert_eq!(store.error().as_deref(), Some("boom"));
        assert!(!store.is_loading());

        store.begin();
        assert!(store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[test]
    fn test_update_returns_closure_result() {
        let store = Store::new(Counter::default());
        let doubled = store.update(|s| {
            s.value = 21;
            s.value * 2
        });

        assert_eq!(doubled, 42);
        assert_eq!(store.snapshot().value, 21);
    }

    #[tokio::test]
    async fn test_update_hands_back_owned_value_and_notifies_once() {
        let store = Store::new(Counter::default());
        let mut rx = store.subscribe();

        let label = store.update(|s| {
            s.value += 1;
            format!("value={}", s.value)
        });

        assert_eq!(label, "value=1");
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let store = Store::new(Counter::default());
        let mut rx = store.subscribe();

        store.update(|s| s.value = 7);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_waits_for_duration() {
        let start = tokio::time::Instant::now();
        Latency::from_millis(800).wait().await;
        assert!(start.elapsed() >= Duration::from_millis(800));
    }
}
