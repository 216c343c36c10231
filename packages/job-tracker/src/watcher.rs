//! Extraction trigger policy for one page.
//!
//! The watcher extracts once when the page becomes interactive, then again
//! after DOM insertions settle: every insertion resets a single pending
//! timer, and extraction runs when the timer fires. Positive runs push a
//! fresh signal to the sink; negative runs push nothing.
//!
//! Page events arrive over a channel, so the host's mutation observer and the
//! message transport stay independent of each other.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::extractor::Extractor;
use crate::traits::clock::{Clock, SystemClock};
use crate::traits::page::{DocumentSource, SignalSink};

/// Something happened to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The document finished loading
    ContentReady,
    /// Nodes were inserted somewhere in the document
    SubtreeInserted,
}

pub type PageEventSender = mpsc::UnboundedSender<PageEvent>;
pub type PageEventReceiver = mpsc::UnboundedReceiver<PageEvent>;

/// Channel pair for feeding a [`PageWatcher`].
pub fn page_events() -> (PageEventSender, PageEventReceiver) {
    mpsc::unbounded_channel()
}

/// Counters returned when the event stream closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub runs: usize,
    pub pushes: usize,
    pub failures: usize,
}

/// Runs the extractor over a page according to the trigger policy.
pub struct PageWatcher<D, S, C = SystemClock> {
    extractor: Arc<Extractor>,
    source: D,
    sink: S,
    clock: C,
    debounce: Duration,
}

impl<D: DocumentSource, S: SignalSink> PageWatcher<D, S, SystemClock> {
    pub fn new(extractor: Arc<Extractor>, source: D, sink: S, debounce: Duration) -> Self {
        Self::with_clock(extractor, source, sink, debounce, SystemClock)
    }
}

impl<D: DocumentSource, S: SignalSink, C: Clock> PageWatcher<D, S, C> {
    pub fn with_clock(
        extractor: Arc<Extractor>,
        source: D,
        sink: S,
        debounce: Duration,
        clock: C,
    ) -> Self {
        Self {
            extractor,
            source,
            sink,
            clock,
            debounce,
        }
    }

    /// Process events until the sender side closes.
    ///
    /// A debounce still pending when the stream closes is dropped: the page
    /// is gone.
    pub async fn run(self, mut events: PageEventReceiver) -> WatchSummary {
        let mut summary = WatchSummary::default();
        let mut ready = self.source.is_loaded();
        let mut deadline: Option<Instant> = None;

        if ready {
            self.extract_once(&mut summary).await;
        }

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(PageEvent::ContentReady) if !ready => {
                        ready = true;
                        self.extract_once(&mut summary).await;
                    }
                    Some(PageEvent::ContentReady) => {}
                    // An unrepresentable deadline never fires
                    Some(PageEvent::SubtreeInserted) if ready => {
                        deadline = Instant::now().checked_add(self.debounce);
                    }
                    // The first run after ready sees these nodes anyway
                    Some(PageEvent::SubtreeInserted) => {}
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    self.extract_once(&mut summary).await;
                }
            }
        }

        debug!(
            runs = summary.runs,
            pushes = summary.pushes,
            failures = summary.failures,
            "Page watcher stopped"
        );
        summary
    }

    async fn extract_once(&self, summary: &mut WatchSummary) {
        summary.runs += 1;

        let snapshot = match self.source.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                summary.failures += 1;
                warn!(error = %e, "Failed to read page snapshot");
                return;
            }
        };

        let Some(signal) = self.extractor.signal(&snapshot, self.clock.now()) else {
            debug!(url = %snapshot.url, "Not a job page, nothing pushed");
            return;
        };

        match self.sink.push(signal).await {
            Ok(()) => {
                summary.pushes += 1;
                info!(url = %snapshot.url, "Job page signal pushed");
            }
            Err(e) => {
                summary.failures += 1;
                warn!(url = %snapshot.url, error = %e, "Failed to push signal");
            }
        }
    }
}
