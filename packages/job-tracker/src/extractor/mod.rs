//! Heuristic job-posting extraction from page markup.
//!
//! Each field walks an ordered fallback chain and stops at the first
//! candidate with non-empty text:
//!
//! - title: selector chain
//! - company: selector chain, then reference-number text, then domain
//! - location: selector chain
//!
//! Nothing here fails at extraction time; exhausted chains yield `""`.

pub mod classify;
pub mod domain;
pub mod fields;

use chrono::{DateTime, Utc};
use scraper::Html;
use tracing::debug;

use crate::error::Result;
use crate::types::config::ExtractorConfig;
use crate::types::signal::{PageInfo, PageSignal, PageSnapshot};

pub use classify::{is_job_page, matches_keywords};
pub use domain::{company_from_domain, extract_domain};
pub use fields::{company_from_reference, SelectorChain};

/// Where the company name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanySource {
    Selector,
    ReferenceNumber,
    Domain,
    /// Every fallback came up empty
    Missing,
}

/// Result of one extraction run over a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub url: String,
    pub page_title: String,
    pub is_job_page: bool,
    pub job_title: String,
    pub company_name: String,
    pub company_source: CompanySource,
    pub job_location: String,
}

impl Extraction {
    /// Signal for the relay, only when the page classified as a job page.
    pub fn into_signal(self, captured_at: DateTime<Utc>) -> Option<PageSignal> {
        if !self.is_job_page {
            return None;
        }
        Some(PageSignal {
            company_name: self.company_name,
            job_title: self.job_title,
            job_location: self.job_location,
            url: self.url,
            captured_at,
        })
    }
}

/// Heuristic page extractor with pre-parsed selector chains.
#[derive(Debug, Clone)]
pub struct Extractor {
    keywords: Vec<String>,
    title: SelectorChain,
    company: SelectorChain,
    location: SelectorChain,
}

impl Extractor {
    /// Build an extractor, rejecting selectors that do not parse.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            keywords: config.keywords.iter().map(|k| k.to_lowercase()).collect(),
            title: SelectorChain::parse(&config.title_selectors)?,
            company: SelectorChain::parse(&config.company_selectors)?,
            location: SelectorChain::parse(&config.location_selectors)?,
        })
    }

    /// Extractor with the built-in keyword set and selector chains.
    pub fn with_defaults() -> Self {
        Self::new(&ExtractorConfig::default()).expect("default selectors are valid")
    }

    /// Classify and extract every field from a snapshot.
    pub fn extract(&self, snapshot: &PageSnapshot) -> Extraction {
        let document = Html::parse_document(&snapshot.html);
        let text = classify::page_text(&document);

        let is_job_page = matches_keywords(
            &text,
            &snapshot.url,
            self.keywords.iter().map(String::as_str),
        );

        let job_title = self.title.first_text(&document);
        let (company_name, company_source) = self.company(&document, &text, &snapshot.url);
        let job_location = self.location.first_text(&document);

        debug!(
            url = %snapshot.url,
            is_job_page,
            job_title = %job_title,
            company = %company_name,
            company_source = ?company_source,
            location = %job_location,
            "Page extracted"
        );

        Extraction {
            url: snapshot.url.clone(),
            page_title: classify::document_title(&document),
            is_job_page,
            job_title,
            company_name,
            company_source,
            job_location,
        }
    }

    /// Extract and return a signal only for job pages.
    pub fn signal(&self, snapshot: &PageSnapshot, captured_at: DateTime<Utc>) -> Option<PageSignal> {
        self.extract(snapshot).into_signal(captured_at)
    }

    /// Answer for `getPageInfo`; fields are filled regardless of
    /// classification.
    pub fn page_info(&self, snapshot: &PageSnapshot) -> PageInfo {
        let extraction = self.extract(snapshot);
        PageInfo {
            title: extraction.page_title,
            domain: extract_domain(&snapshot.url).unwrap_or_default(),
            url: extraction.url,
            job_title: extraction.job_title,
            company_name: extraction.company_name,
            job_location: extraction.job_location,
        }
    }

    fn company(&self, document: &Html, text: &str, url: &str) -> (String, CompanySource) {
        if let Some(found) = self.company.first_match(document) {
            debug!(selector = %found.selector, "Company matched selector");
            return (found.text, CompanySource::Selector);
        }
        if let Some(name) = company_from_reference(text) {
            return (name, CompanySource::ReferenceNumber);
        }
        let from_domain = company_from_domain(url);
        if from_domain.is_empty() {
            (from_domain, CompanySource::Missing)
        } else {
            (from_domain, CompanySource::Domain)
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}
