//! Job-page classification and visible-text collection.

use scraper::{ElementRef, Html, Node, Selector};

use crate::types::config::DEFAULT_JOB_KEYWORDS;

/// Elements whose text is never rendered.
const HIDDEN_TEXT_PARENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Whether a page looks like a job posting, using the default keyword set.
///
/// True if any keyword occurs, case-insensitively, in the page text or the
/// URL. One hit is enough.
pub fn is_job_page(page_text: &str, page_url: &str) -> bool {
    matches_keywords(page_text, page_url, DEFAULT_JOB_KEYWORDS)
}

/// Keyword test behind [`is_job_page`] with a caller-supplied keyword set.
pub fn matches_keywords<'a>(
    page_text: &str,
    page_url: &str,
    keywords: impl IntoIterator<Item = &'a str>,
) -> bool {
    let text = page_text.to_lowercase();
    let url = page_url.to_lowercase();

    keywords.into_iter().any(|keyword| {
        let keyword = keyword.to_lowercase();
        !keyword.is_empty() && (text.contains(&keyword) || url.contains(&keyword))
    })
}

/// Visible text fragments of the document body, in document order.
///
/// Each text node becomes one trimmed fragment; blank nodes and text inside
/// `script`/`style`/`noscript`/`template` are skipped.
pub fn text_fragments(document: &Html) -> Vec<String> {
    let Some(body) = body(document) else {
        return Vec::new();
    };

    body.descendants()
        .filter_map(|node| {
            let Node::Text(text) = node.value() else {
                return None;
            };
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                .is_some_and(|name| HIDDEN_TEXT_PARENTS.contains(&name));
            let trimmed = text.trim();
            (!hidden && !trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

/// Visible body text as one string, fragments separated by newlines.
pub fn page_text(document: &Html) -> String {
    text_fragments(document).join("\n")
}

/// Content of the document's `<title>`, trimmed.
pub fn document_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn body(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("body").ok()?;
    document.select(&selector).next()
}
