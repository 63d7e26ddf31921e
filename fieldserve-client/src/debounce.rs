//! Cancellable delayed dispatch for search input.
//!
//! Rapid keystrokes each call [`Debouncer::call`]; only the last closure
//! survives the delay window. Teardown is explicit via [`Debouncer::cancel`]
//! and implicit on drop, so an unmounted screen can never fire a stale
//! query.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `action` after the delay, replacing any pending schedule.
    pub fn call<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action().await;
        });

        if let Some(previous) = self.swap(Some(handle)) {
            previous.abort();
        }
    }

    /// Drop whatever is pending without firing it.
    pub fn cancel(&self) {
        if let Some(pending) = self.swap(None) {
            pending.abort();
        }
    }

    fn swap(&self, next: Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::replace(&mut *pending, next),
            Err(_) => {
                tracing::error!("debounce handle lock poisoned");
                None
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
