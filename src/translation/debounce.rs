/*!
 * Debounced scheduling of translation requests.
 */

use log::trace;
use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default quiet period before an input change is acted upon
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

/// Coalesces bursts of events into a single delayed action.
///
/// Each `schedule` call cancels the pending timer and starts a new one; only
/// the last action scheduled within a quiet period runs. Once a timer fires,
/// its action is spawned as a separate task and no longer cancellable here.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: Mutex::new(None),
        }
    }

    /// Run `action` after the quiet period unless another call supersedes it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let quiet = self.quiet;
        let mut pending = self.pending.lock();

        if let Some(previous) = pending.take() {
            previous.abort();
            trace!("Debounce timer reset");
        }

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            tokio::spawn(action());
        }));
    }

    /// Cancel the pending timer, if any. Returns whether one was waiting.
    pub fn cancel_pending(&self) -> bool {
        match self.pending.lock().take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    /// Whether a timer is still waiting to fire
    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
