//! Cancellable background timers driving the spin animation and the
//! celebration cue.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};

/// Handle to a timer running on its own thread.
///
/// Cancelling (or dropping) the handle wakes the thread, which exits without
/// running the callback again. Cancellation never joins, so it is safe while
/// holding a lock that the callback itself takes; callbacks must re-check
/// their own state once they hold that lock.
#[derive(Debug)]
pub struct Ticker {
    cancel: Option<Sender<()>>,
}

impl Ticker {
    /// Runs `callback` every `interval` until it returns `false` or the
    /// ticker is cancelled.
    pub fn every<F>(interval: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        Self::spawn(move |wait| loop {
            if !wait(interval) || !callback() {
                break;
            }
        })
    }

    /// Runs `callback` once after `delay` unless cancelled first.
    pub fn once<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::spawn(move |wait| {
            if wait(delay) {
                callback();
            }
        })
    }

    pub fn cancel(&mut self) {
        self.cancel.take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_none()
    }

    fn spawn<F>(body: F) -> Self
    where
        F: FnOnce(&dyn Fn(Duration) -> bool) + Send + 'static,
    {
        // Nothing is ever sent; dropping the sender disconnects the channel.
        let (tx, rx) = bounded::<()>(0);
        thread::spawn(move || {
            // `true` when the full duration elapsed, `false` once cancelled.
            let wait = |duration: Duration| {
                matches!(rx.recv_timeout(duration), Err(RecvTimeoutError::Timeout))
            };
            body(&wait);
        });

        Self { cancel: Some(tx) }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
