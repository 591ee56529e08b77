//! Async readiness gate
//!
//! Heavy engine modules are loaded at most once per process. The gate runs
//! a single initialization future (concurrent initializers share it) and
//! broadcasts readiness to anyone waiting. Waiters never poll: they either
//! observe readiness or give up after one bounded wait.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{watch, OnceCell};

use crate::error::{EngineError, Result};

/// One-shot readiness gate around a lazily loaded value
pub struct ReadinessGate<T> {
    value: OnceCell<T>,
    ready: watch::Sender<bool>,
}

impl<T> Default for ReadinessGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReadinessGate<T> {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            value: OnceCell::new(),
            ready,
        }
    }

    /// Whether the value has been loaded
    pub fn is_ready(&self) -> bool {
        self.value.initialized()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Load the value, running `init` only if no other caller has
    ///
    /// Concurrent callers await the same in-flight initialization.
    pub async fn initialize<F, Fut>(&self, init: F) -> &T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let value = self.value.get_or_init(init).await;
        if !*self.ready.borrow() {
            tracing::debug!("readiness gate opened");
        }
        self.ready.send_replace(true);
        value
    }

    /// Wait at most `limit` for the value
    ///
    /// Returns immediately when already loaded; otherwise waits once and
    /// reports [`EngineError::NotReady`] if the deadline passes.
    pub async fn wait_ready(&self, limit: Duration) -> Result<&T> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let mut rx = self.ready.subscribe();
        let opened = tokio::time::timeout(limit, rx.wait_for(|ready| *ready))
            .await
            .map(|changed| changed.is_ok())
            .unwrap_or(false);

        if !opened {
            tracing::debug!(?limit, "readiness wait timed out");
            return Err(EngineError::NotReady);
        }
        self.value.get().ok_or(EngineError::NotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out_when_never_loaded() {
        let gate: ReadinessGate<u32> = ReadinessGate::new();
        let result = gate.wait_ready(Duration::from_millis(100)).await;
        assert_eq!(result, Err(EngineError::NotReady));
        assert!(!gate.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_gate_returns_immediately() {
        let gate = ReadinessGate::new();
        gate.initialize(|| async { 7u32 }).await;
        assert!(gate.is_ready());
        assert_eq!(gate.wait_ready(Duration::ZERO).await, Ok(&7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiter_observes_late_initialization() {
        let gate: ReadinessGate<&'static str> = ReadinessGate::new();

        let waiter = gate.wait_ready(Duration::from_millis(100));
        let loader = async {
            tokio::time::sleep(Duration::from_millis(40)).await;
            gate.initialize(|| async { "loaded" }).await;
        };

        let (result, ()) = tokio::join!(waiter, loader);
        assert_eq!(result, Ok(&"loaded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_initializers_load_once() {
        let gate: ReadinessGate<usize> = ReadinessGate::new();
        let loads = AtomicUsize::new(0);

        let counter = &loads;
        let load = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            42
        };

        let (a, b) = tokio::join!(gate.initialize(load), gate.initialize(load));
        assert_eq!((*a, *b), (42, 42));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
