//! Keystroke debouncing for text-driven lookups.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Waits out a quiet period before a text lookup is allowed to fire.
///
/// Every call supersedes the previous one: a pending wait whose keystroke
/// is no longer the latest resolves to `None` instead of firing. Queries
/// below the minimum length never fire but still supersede, so a deleted
/// character cancels the lookup the longer text had pending.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    min_len: usize,
    keystrokes: AtomicU64,
}

impl Debouncer {
    pub fn new(quiet: Duration, min_len: usize) -> Self {
        Self {
            quiet,
            min_len,
            keystrokes: AtomicU64::new(0),
        }
    }

    /// Register `query` as the latest input and wait for it to settle.
    ///
    /// `Some(())` means the input was stable for the whole quiet period and
    /// the lookup may fire; `None` means it was too short or superseded.
    pub async fn settle(&self, query: &str) -> Option<()> {
        let mine = self.keystrokes.fetch_add(1, Ordering::SeqCst) + 1;

        if query.chars().count() < self.min_len {
            return None;
        }

        tokio::time::sleep(self.quiet).await;
        (self.keystrokes.load(Ordering::SeqCst) == mine).then_some(())
    }
}
