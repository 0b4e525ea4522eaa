//! Trailing-edge debounce for filter edits.

use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Runs an action once the caller has been quiet for a fixed window.
///
/// Every [`call`](Debouncer::call) supersedes the previous pending one, so
/// a burst of edits produces a single action carrying the last value.
/// Dropping the debouncer (or calling [`cancel`](Debouncer::cancel))
/// cancels whatever is pending. Must be used inside a tokio runtime.
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `action` to run after the window elapses, cancelling any
    /// previously scheduled action that has not fired yet.
    pub fn call<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let previous = self.pending.lock().unwrap().replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let window = self.window;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(window) => action.await,
            }
        });
    }

    /// Cancel the pending action, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.pending.lock().unwrap().take() {
            token.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting_action(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn burst_collapses_to_one_action() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            debouncer.call(counting_action(&fired));
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancel_stops_pending_action() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let fired = Arc::new(AtomicUsize::new(0));

        debouncer.call(counting_action(&fired));
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn drop_cancels_pending_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let debouncer = Debouncer::new(Duration::from_millis(20));
            debouncer.call(counting_action(&fired));
        }
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fires_again_after_settling() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        let fired = Arc::new(AtomicUsize::new(0));

        debouncer.call(counting_action(&fired));
        tokio::time::sleep(Duration::from_millis(40)).await;
        debouncer.call(counting_action(&fired));
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }
}
