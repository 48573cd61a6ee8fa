//! Debounced search input
//!
//! Raw keystrokes arrive via [`SearchDebouncer::input`]; the committed value
//! is published on a watch channel once the input has been quiescent for the
//! configured delay. Only the committed value participates in fingerprints,
//! which keeps typing from turning into a request storm.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Smooths rapid keystrokes into a single committed search value.
///
/// A new keystroke cancels and reschedules the pending timer exactly.
/// Clearing the input commits immediately so an emptied search box never
/// lags behind the UI.
pub struct SearchDebouncer {
    delay: Duration,
    committed: watch::Sender<String>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        let (committed, _) = watch::channel(String::new());
        Self {
            delay,
            committed,
            pending: Mutex::new(None),
        }
    }

    /// Feed one keystroke's worth of raw input.
    pub fn input(&self, raw: &str) {
        let mut pending = self.pending.lock();
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        if raw.is_empty() {
            trace!("search cleared, committing immediately");
            let _ = self.committed.send_if_modified(|current| {
                if current.is_empty() {
                    false
                } else {
                    current.clear();
                    true
                }
            });
            return;
        }

        let tx = self.committed.clone();
        let value = raw.to_string();
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!(value = %value, "committing search input");
            let _ = tx.send_if_modified(|current| {
                if *current == value {
                    false
                } else {
                    *current = value.clone();
                    true
                }
            });
        }));
    }

    /// Watch the committed value.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.committed.subscribe()
    }

    /// Last committed value.
    pub fn committed(&self) -> String {
        self.committed.borrow().clone()
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.lock().take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_commits_once_after_quiescence() {
        let debouncer = SearchDebouncer::new(DELAY);
        let mut rx = debouncer.subscribe();

        debouncer.input("health");
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.input("healthc");
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.input("healthcare");

        // Still inside the window: nothing committed yet.
        assert_eq!(debouncer.committed(), "");

        tokio::time::sleep(Duration::from_millis(510)).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "healthcare");

        // Exactly one emission for the whole burst.
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_commits_with_zero_delay() {
        let debouncer = SearchDebouncer::new(DELAY);

        debouncer.input("health");
        tokio::time::sleep(Duration::from_millis(510)).await;
        assert_eq!(debouncer.committed(), "health");

        debouncer.input("");
        assert_eq!(debouncer.committed(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_cancels_pending_commit() {
        let debouncer = SearchDebouncer::new(DELAY);
        let mut rx = debouncer.subscribe();

        debouncer.input("h");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.input("");

        tokio::time::sleep(Duration::from_millis(600)).await;
        // The aborted timer must not resurrect "h".
        assert_eq!(debouncer.committed(), "");
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_reschedules_timer() {
        let debouncer = SearchDebouncer::new(DELAY);

        debouncer.input("bud");
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.input("budget");
        tokio::time::sleep(Duration::from_millis(400)).await;

        // 800ms since the first keystroke but only 400ms of quiescence.
        assert_eq!(debouncer.committed(), "");

        tokio::time::sleep(Duration::from_millis(110)).await;
        assert_eq!(debouncer.committed(), "budget");
    }
}
