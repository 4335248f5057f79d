use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out increasing sequence numbers to dispatched requests.
///
/// A response is only applied if its number is still the latest issued, so a
/// slow request finishing after a newer one is dropped.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next sequence number (starting at 1)
    pub fn next(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `sequence` is the most recently issued number
    pub fn is_latest(&self, sequence: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == sequence
    }

    /// Most recently issued number, 0 before the first request
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}
