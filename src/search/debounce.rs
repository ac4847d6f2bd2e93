//! Single-slot debounce timer.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Delivers an event on a channel after a quiet period.
///
/// Holds at most one pending timer. Arming replaces the pending timer, so
/// only the last event armed within the quiet period is delivered.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    slot: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            delay,
            tx,
            slot: None,
        }
    }

    /// Schedule `event`, cancelling any pending one.
    pub fn arm(&mut self, event: T) {
        self.clear();

        let tx = self.tx.clone();
        let delay = self.delay;
        self.slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the app is shutting down.
            let _ = tx.send(event);
        }));
    }

    /// Cancel the pending event. Returns whether one was pending.
    pub fn clear(&mut self) -> bool {
        match self.slot.take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.slot.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.slot.take() {
            handle.abort();
        }
    }
}
