//! Text normalization
//!
//! Strips the boilerplate the tracking service injects into post text:
//! - The service hashtag
//! - URLs
//! - "via @service" attribution
//!
//! then collapses whitespace and removes surrounding quotes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Name of the service that generates the posts
pub const SERVICE_NAME: &str = "runkeeper";

static SERVICE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)#{SERVICE_NAME}\b")).expect("valid tag regex"));

/// URL pattern shared with the renderer
pub(crate) static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));

static ATTRIBUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bvia\s+@?{SERVICE_NAME}\b")).expect("valid attribution regex")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Normalizer for raw post text
pub struct Normalizer;

impl Normalizer {
    /// Normalize raw post text. Total over all strings, including "".
    pub fn normalize(text: &str) -> String {
        let text = SERVICE_TAG_RE.replace_all(text, "");
        let text = URL_RE.replace_all(&text, "");
        let text = ATTRIBUTION_RE.replace_all(&text, "");
        let text = collapse_whitespace(&text);
        strip_quotes(&text).to_string()
    }
}

/// Collapse every whitespace run to a single space
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// Trim, then peel surrounding double quotes until the ends are stable
fn strip_quotes(text: &str) -> &str {
    let mut current = text.trim();
    loop {
        let mut next = current;
        if let Some(rest) = next.strip_prefix('"') {
            next = rest;
        }
        if let Some(rest) = next.strip_suffix('"') {
            next = rest;
        }
        let next = next.trim();
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

/// First URL in the text, if any
pub fn first_url(text: &str) -> Option<&str> {
    URL_RE.find(text).map(|m| m.as_str())
}
