//! Ordered selector chains and the reference-number heuristic.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{Result, TrackerError};

/// A parsed, ordered list of CSS selectors, most specific first.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    selectors: Vec<(String, Selector)>,
}

/// Which link of the chain produced a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainMatch {
    pub index: usize,
    pub selector: String,
    pub text: String,
}

impl SelectorChain {
    /// Parse every selector up front so bad configuration fails at build time.
    pub fn parse<S: AsRef<str>>(selectors: &[S]) -> Result<Self> {
        let selectors = selectors
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                Selector::parse(raw)
                    .map(|selector| (raw.to_string(), selector))
                    .map_err(|e| TrackerError::InvalidSelector {
                        selector: raw.to_string(),
                        reason: format!("{e:?}"),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { selectors })
    }

    /// First element, in selector order then document order, whose trimmed
    /// text content is non-empty.
    pub fn first_match(&self, document: &Html) -> Option<ChainMatch> {
        self.selectors
            .iter()
            .enumerate()
            .find_map(|(index, (raw, selector))| {
                document.select(selector).find_map(|el| {
                    let text = el.text().collect::<String>();
                    let text = text.trim();
                    (!text.is_empty()).then(|| ChainMatch {
                        index,
                        selector: raw.clone(),
                        text: text.to_string(),
                    })
                })
            })
    }

    /// Text of [`first_match`](Self::first_match), or empty.
    pub fn first_text(&self, document: &Html) -> String {
        self.first_match(document)
            .map(|m| m.text)
            .unwrap_or_default()
    }
}

/// Label + identifier + trailing name, e.g. `Req ID: 12345 - Acme Corp`.
///
/// The identifier must contain a digit; the trailing free text runs to the
/// end of the fragment.
const REFERENCE_PATTERN: &str = r"(?i)\b(?:reference|ref|requisition|req|job\s+id|id)\b\.?\s*(?:id\b|no\.?|number\b|#)?\s*[:#]?\s*([a-z0-9][a-z0-9_-]*\d[a-z0-9_-]*)\s*[-–—|:]\s*(\S.*)";

fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("reference pattern is valid"))
}

/// Name fragment trailing a reference/requisition number in page text.
///
/// `text` is scanned as a whole; a label and its identifier may sit in
/// adjacent fragments, but the returned name never spans a line break.
pub fn company_from_reference(text: &str) -> Option<String> {
    reference_regex().captures_iter(text).find_map(|caps| {
        let name = caps.get(2)?.as_str().trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}
