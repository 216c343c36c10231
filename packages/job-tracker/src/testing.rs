//! Testing utilities including mock implementations.
//!
//! These are useful for testing hosts that embed the tracker without a real
//! browser page or wall clock.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Mutex, PoisonError, RwLock};

use crate::error::Result;
use crate::traits::clock::Clock;
use crate::traits::page::{DocumentSource, SignalSink};
use crate::types::signal::{PageSignal, PageSnapshot};

/// A job posting with every selector chain matching.
pub const JOB_POSTING_HTML: &str = r#"<html>
<head><title>Senior Rust Engineer - Acme</title></head>
<body>
  <h1 class="job-title">Senior Rust Engineer</h1>
  <div class="company-name">Acme, Inc</div>
  <span class="job-location">Remote (EU)</span>
  <button>Apply for this position</button>
</body>
</html>"#;

/// A page with no job keyword in its text.
pub const PLAIN_PAGE_HTML: &str = r#"<html>
<head><title>Recipes</title></head>
<body><h1>Sourdough</h1><p>Flour, water, salt.</p></body>
</html>"#;

/// A client-rendered shell before its content arrives.
pub const SPA_SHELL_HTML: &str = r#"<html><head><title>Loading</title></head><body><div id="root"></div></body></html>"#;

/// A manually driven clock.
pub struct MockClock {
    now: RwLock<DateTime<Utc>>,
}

impl MockClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Clock set to `millis` after the Unix epoch.
    pub fn at_millis(millis: i64) -> Self {
        let now = Utc
            .timestamp_millis_opt(millis)
            .single()
            .unwrap_or_default();
        Self::new(now)
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A page whose markup tests can swap out to simulate DOM mutations.
pub struct StaticPage {
    url: String,
    html: RwLock<String>,
    loaded: bool,
}

impl StaticPage {
    /// A page that is already interactive.
    pub fn loaded(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: RwLock::new(html.into()),
            loaded: true,
        }
    }

    /// A page still loading; the watcher waits for `ContentReady`.
    pub fn loading(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            loaded: false,
            ..Self::loaded(url, html)
        }
    }

    pub fn set_html(&self, html: impl Into<String>) {
        *self.html.write().unwrap_or_else(PoisonError::into_inner) = html.into();
    }
}

impl DocumentSource for StaticPage {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn snapshot(&self) -> Result<PageSnapshot> {
        let html = self.html.read().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(PageSnapshot::new(self.url.clone(), html))
    }
}

/// A sink that records every pushed signal.
#[derive(Default)]
pub struct RecordingSink {
    pushed: Mutex<Vec<PageSignal>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushed(&self) -> Vec<PageSignal> {
        self.pushed.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self) -> usize {
        self.pushed.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl SignalSink for RecordingSink {
    async fn push(&self, signal: PageSignal) -> Result<()> {
        self.pushed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(signal);
        Ok(())
    }
}
