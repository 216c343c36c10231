//! Configuration types for extraction and the signal relay.
//!
//! Both configs deserialize with `#[serde(default)]`, so a partial TOML file
//! only overrides the keys it names.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Keywords that mark a page as job-related.
pub const DEFAULT_JOB_KEYWORDS: [&str; 11] = [
    "apply",
    "application",
    "career",
    "job",
    "position",
    "hiring",
    "work",
    "employment",
    "opportunity",
    "openings",
    "vacancy",
];

/// Job title candidates, most specific first.
pub const DEFAULT_TITLE_SELECTORS: [&str; 6] = [
    r#"h1[class*="job"]"#,
    r#"h1[class*="title"]"#,
    ".job-title",
    ".position-title",
    r#"[data-testid*="job-title"]"#,
    "h1",
];

/// Company name candidates, most specific first.
pub const DEFAULT_COMPANY_SELECTORS: [&str; 5] = [
    r#"[class*="company"]"#,
    r#"[class*="employer"]"#,
    r#"[data-testid*="company"]"#,
    ".company-name",
    ".employer-name",
];

/// Job location candidates, most specific first.
pub const DEFAULT_LOCATION_SELECTORS: [&str; 4] = [
    r#"[itemprop="jobLocation"]"#,
    r#"[data-testid*="location"]"#,
    ".job-location",
    r#"[class*="location"]"#,
];

/// Quiet period after the last DOM insertion before re-extracting.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Freshness window of the relay slot.
pub const DEFAULT_SIGNAL_TTL_SECS: u64 = 5 * 60;

/// Configuration for the page extractor and its trigger policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Case-insensitive keywords; one hit in page text or URL classifies
    /// the page as a job page.
    pub keywords: Vec<String>,

    pub title_selectors: Vec<String>,

    pub company_selectors: Vec<String>,

    pub location_selectors: Vec<String>,

    /// Milliseconds to wait after the last DOM insertion.
    ///
    /// Default: 500.
    pub debounce_ms: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            keywords: to_strings(&DEFAULT_JOB_KEYWORDS),
            title_selectors: to_strings(&DEFAULT_TITLE_SELECTORS),
            company_selectors: to_strings(&DEFAULT_COMPANY_SELECTORS),
            location_selectors: to_strings(&DEFAULT_LOCATION_SELECTORS),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl ExtractorConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the keyword set.
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_title_selectors(
        mut self,
        selectors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.title_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_company_selectors(
        mut self,
        selectors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.company_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location_selectors(
        mut self,
        selectors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.location_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Saturates at `u64::MAX` milliseconds.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Configuration for the single-slot signal relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Seconds a pushed signal stays fresh. Default: 300.
    pub ttl_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SIGNAL_TTL_SECS,
        }
    }
}

impl RelayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_secs = ttl.as_secs();
        self
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
