//! Debounced view of a changing value.
//!
//! A [`Debouncer`] watches an input channel and republishes its value only
//! after the input has stayed unchanged for the configured delay. Every change
//! inside the window restarts the timer, so a burst of keystrokes produces a
//! single downstream update carrying the last value.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Delay between the last keystroke and a suggestion request.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Republishes a `watch` value once it has been stable for a delay.
///
/// The background task stops when the input sender is dropped or the
/// debouncer itself is dropped. A value still inside its window at that
/// point is never published.
#[derive(Debug)]
pub struct Debouncer<T> {
    output: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start debouncing `input`.
    ///
    /// The output starts at the input's current value. Must be called from
    /// within a Tokio runtime.
    #[must_use]
    pub fn spawn(mut input: watch::Receiver<T>, delay: Duration) -> Self {
        let initial = input.borrow_and_update().clone();
        let (tx, output) = watch::channel(initial);

        let task = tokio::spawn(async move {
            while input.changed().await.is_ok() {
                // Wait until the input goes quiet for a full window
                loop {
                    tokio::select! {
                        changed = input.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                        () = tokio::time::sleep(delay) => break,
                    }
                }

                let settled = input.borrow_and_update().clone();
                if tx.send(settled).is_err() {
                    return;
                }
            }
        });

        Self { output, task }
    }

    /// A receiver of debounced values.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }

    /// The most recently published value.
    #[must_use]
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_burst_yields_single_update_with_last_value() {
        let (tx, rx) = watch::channel(String::new());
        let debouncer = Debouncer::spawn(rx, DELAY);
        let mut out = debouncer.subscribe();

        tx.send("h".to_string()).unwrap();
        sleep(Duration::from_millis(100)).await;
        tx.send("ho".to_string()).unwrap();
        sleep(Duration::from_millis(299)).await;
        assert!(!out.has_changed().unwrap());

        sleep(Duration::from_millis(2)).await;
        assert!(out.has_changed().unwrap());
        assert_eq!(*out.borrow_and_update(), "ho");

        sleep(Duration::from_secs(2)).await;
        assert!(!out.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separated_changes_each_publish() {
        let (tx, rx) = watch::channel(0_u32);
        let debouncer = Debouncer::spawn(rx, DELAY);
        let mut out = debouncer.subscribe();

        tx.send(1).unwrap();
        sleep(Duration::from_millis(350)).await;
        assert_eq!(*out.borrow_and_update(), 1);

        tx.send(2).unwrap();
        sleep(Duration::from_millis(350)).await;
        assert!(out.has_changed().unwrap());
        assert_eq!(*out.borrow_and_update(), 2);
        assert_eq!(debouncer.current(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_value_is_published_immediately() {
        let (_tx, rx) = watch::channel("start");
        let debouncer = Debouncer::spawn(rx, DELAY);
        assert_eq!(debouncer.current(), "start");
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_input_flushes_nothing() {
        let (tx, rx) = watch::channel(String::new());
        let debouncer = Debouncer::spawn(rx, DELAY);
        let mut out = debouncer.subscribe();

        tx.send("pending".to_string()).unwrap();
        sleep(Duration::from_millis(10)).await;
        drop(tx);
        sleep(Duration::from_secs(1)).await;

        assert!(out.borrow_and_update().is_empty());
    }
}
