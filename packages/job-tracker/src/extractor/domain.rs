//! Host-name helpers used for the `domain` field and the company fallback.
//!
//! Unparseable URLs are not errors: every helper returns `None` or an empty
//! string and the caller keeps going.

use url::Url;

/// Lower-cased host of `url`, if it parses and has one.
pub fn host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(|h| h.to_ascii_lowercase())
}

/// Host with a leading `www.` removed, e.g. `jobs.acme.com`.
pub fn extract_domain(url: &str) -> Option<String> {
    let host = host(url)?;
    let domain = host.strip_prefix("www.").unwrap_or(&host);
    (!domain.is_empty()).then(|| domain.to_string())
}

/// Company guess from the first label of the domain.
///
/// `https://www.Acme.com/jobs` gives `acme`. Empty when the URL has no
/// usable host.
pub fn company_from_domain(url: &str) -> String {
    extract_domain(url)
        .and_then(|domain| domain.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain_strips_leading_www_only() {
        assert_eq!(
            extract_domain("https://www.Acme.com/jobs").as_deref(),
            Some("acme.com")
        );
        assert_eq!(
            extract_domain("https://careers.www.example.org/").as_deref(),
            Some("careers.www.example.org")
        );
        assert_eq!(
            extract_domain("http://localhost:8080/apply").as_deref(),
            Some("localhost")
        );
    }

    #[test]
    fn test_company_from_domain() {
        assert_eq!(company_from_domain("https://www.Acme.com/jobs"), "acme");
        assert_eq!(company_from_domain("https://jobs.lever.co/initech"), "jobs");
        assert_eq!(company_from_domain("https://globex.io"), "globex");
    }

    #[test]
    fn test_malformed_urls_yield_empty() {
        assert_eq!(extract_domain("not a url"), None);
        assert_eq!(extract_domain("mailto:hr@acme.com"), None);
        assert_eq!(company_from_domain("::::"), "");
        assert_eq!(host(""), None);
    }
}
