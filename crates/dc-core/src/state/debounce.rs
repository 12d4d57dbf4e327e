//! Debounced scheduling for search input

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::trace;

use super::Command;

/// Delay between the last keystroke and the search query running
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Single-slot delayed task: scheduling again cancels the pending one.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` after the delay unless another schedule or a cancel comes first
    pub fn schedule<F>(&mut self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.cancel() {
            trace!("replaced pending debounced task");
        }
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Abort the pending task; returns whether one was still waiting
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Coalesces search keystrokes into one [`Command::SetSearch`]
#[derive(Debug)]
pub struct SearchDebouncer {
    debouncer: Debouncer,
    commands: UnboundedSender<Command>,
    /// Text of the scheduled search
    latest: Option<String>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration, commands: UnboundedSender<Command>) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            commands,
            latest: None,
        }
    }

    /// Record the latest search text
    pub fn input(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.latest = Some(text.clone());
        let commands = self.commands.clone();
        self.debouncer.schedule(move || {
            // The receiver is gone only when the session shut down
            let _ = commands.send(Command::SetSearch(text));
        });
    }

    /// Drop any pending search, e.g. when filters are cleared
    pub fn cancel(&mut self) -> bool {
        self.latest = None;
        self.debouncer.cancel()
    }

    /// Stop waiting and hand back the search that has not fired yet
    pub fn flush(&mut self) -> Option<Command> {
        let latest = self.latest.take();
        if self.debouncer.cancel() {
            latest.map(Command::SetSearch)
        } else {
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_coalesces() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut search = SearchDebouncer::new(SEARCH_DEBOUNCE, tx);

        search.input("b");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.input("be");
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.input("beta");
        assert!(search.is_pending());

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(rx.recv().await, Some(Command::SetSearch("beta".into())));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_returns_unfired_search_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut search = SearchDebouncer::new(SEARCH_DEBOUNCE, tx);

        search.input("gam");
        search.input("gamma");
        assert_eq!(search.flush(), Some(Command::SetSearch("gamma".into())));
        assert_eq!(search.flush(), None);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());

        search.input("delta");
        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(search.flush(), None);
        assert_eq!(rx.try_recv().ok(), Some(Command::SetSearch("delta".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay_only() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        let counter = fired.clone();
        debouncer.schedule(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        let counter = fired.clone();
        debouncer.schedule(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
