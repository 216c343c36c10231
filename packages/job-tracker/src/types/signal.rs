//! Page-side types: the snapshot the extractor reads and what it produces.
//!
//! A [`PageSignal`] is the best-effort result of one extraction run. It is
//! immutable once built and is superseded, never merged, by the next one.
//!
//! # Example
//!
//! ```rust
//! use job_tracker::PageSignal;
//!
//! let signal = PageSignal::new("https://acme.com/jobs/42")
//!     .with_company("Acme")
//!     .with_title("Backend Engineer")
//!     .with_location("Remote");
//! assert_eq!(signal.company_name, "Acme");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured extraction result from one page visit.
///
/// Wire shape (camelCase, `timestamp` in epoch milliseconds):
/// `{companyName, jobTitle, jobLocation, url, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSignal {
    #[serde(default)]
    pub company_name: String,

    #[serde(default)]
    pub job_title: String,

    #[serde(default)]
    pub job_location: String,

    pub url: String,

    /// When the page produced the signal.
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub captured_at: DateTime<Utc>,
}

impl PageSignal {
    /// Create an empty signal for a URL, stamped now.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            company_name: String::new(),
            job_title: String::new(),
            job_location: String::new(),
            url: url.into(),
            captured_at: Utc::now(),
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company_name = company.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.job_title = title.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.job_location = location.into();
        self
    }

    /// Set the capture timestamp.
    pub fn with_captured_at(mut self, captured_at: DateTime<Utc>) -> Self {
        self.captured_at = captured_at;
        self
    }
}

/// A point-in-time view of a page: its address and current markup.
///
/// Client-rendered pages change after load, so the extractor always works on
/// a fresh snapshot rather than holding on to a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// What the page context reports for `getPageInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Document `<title>`, empty if missing
    pub title: String,
    pub url: String,
    /// Host with a leading `www.` removed
    pub domain: String,
    pub job_title: String,
    pub company_name: String,
    pub job_location: String,
}

/// The background context's view of a browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: u32,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub active: bool,
}

impl TabInfo {
    pub fn new(id: u32, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            title: String::new(),
            active: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
