//! Written-content detection
//!
//! A post counts as user-written when something authored survives the removal
//! of the service's template vocabulary. Residue below `MIN_WRITTEN_CHARS`
//! alphanumeric characters (stray punctuation, a lone letter) is noise.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalizer::{collapse_whitespace, Normalizer};
use crate::types::WrittenContent;

/// Minimum alphanumeric characters left after template removal
pub const MIN_WRITTEN_CHARS: usize = 3;

/// Template phrases, longest first so sub-phrases never strand an article
pub const TEMPLATE_PHRASES: [&str; 20] = [
    "just completed an",
    "just completed a",
    "just completed",
    "just posted an",
    "just posted a",
    "just posted",
    "completed an",
    "completed a",
    "posted an",
    "posted a",
    "with @runkeeper",
    "with runkeeper",
    "@runkeeper",
    "runkeeper",
    "check it out",
    "activity",
    "workout",
    "distance",
    "time",
    "pace",
];

/// Bare activity verbs the template uses
pub const TEMPLATE_VERBS: [&str; 7] = ["run", "walk", "bike", "ride", "swim", "hike", "elliptical"];

/// Distances and clock durations the template prints
const TEMPLATE_PATTERNS: [&str; 2] = [
    r"\b\d+(?:\.\d+)?\s*(?:mi|miles?|km|kilometers?|kilometres?)\b",
    r"\b\d{1,2}:\d{2}(?::\d{2})?\b",
];

static TEMPLATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    let phrases = TEMPLATE_PHRASES.iter().map(|p| whole_word(p));
    let patterns = TEMPLATE_PATTERNS.iter().map(|p| p.to_string());
    let verbs = TEMPLATE_VERBS.iter().map(|v| whole_word(v));

    phrases
        .chain(patterns)
        .chain(verbs)
        .map(|pattern| Regex::new(&pattern).expect("valid template regex"))
        .collect()
});

/// Escape a token and anchor it at word boundaries where it has word edges
fn whole_word(token: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let start = if token.starts_with(is_word) { r"\b" } else { "" };
    let end = if token.ends_with(is_word) { r"\b" } else { "" };
    format!("{start}{}{end}", regex::escape(token))
}

/// Detector for author-added commentary
pub struct WrittenContentDetector;

impl WrittenContentDetector {
    /// Detect written content in raw post text
    pub fn detect(text: &str) -> WrittenContent {
        Self::detect_normalized(&Normalizer::normalize(text))
    }

    /// Detect written content in text that has already been normalized
    pub fn detect_normalized(normalized: &str) -> WrittenContent {
        let residue = template_residue(normalized);
        let authored_chars = residue.chars().filter(|c| c.is_alphanumeric()).count();

        if authored_chars >= MIN_WRITTEN_CHARS {
            WrittenContent {
                is_user_written: true,
                written_text: normalized.to_string(),
            }
        } else {
            WrittenContent::default()
        }
    }
}

/// Lower-cased text with all template vocabulary removed
pub fn template_residue(normalized: &str) -> String {
    let mut residue = normalized.to_lowercase();
    for re in TEMPLATE_RES.iter() {
        residue = re.replace_all(&residue, " ").into_owned();
    }
    collapse_whitespace(&residue).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pure_template_not_written() {
        let raw = "Just completed a 4.02 mi run with @RunKeeper. Check it out! http://rnkpr.com/abc #RunKeeper";
        let written = WrittenContentDetector::detect(raw);
        assert!(!written.is_user_written);
        assert_eq!(written.written_text, "");
    }

    #[test]
    fn test_template_with_stats_not_written() {
        let raw = "Just completed a run - Distance: 3.1 mi, Time: 25:01, Pace: 8:04 #RunKeeper";
        assert!(!WrittenContentDetector::detect(raw).is_user_written);
    }

    #[test]
    fn test_commentary_is_written() {
        let raw = "\"Just completed a 5.00 km run - legs are toast! http://rnkpr.com/x\"";
        let written = WrittenContentDetector::detect(raw);
        assert!(written.is_user_written);
        assert_eq!(
            written.written_text,
            "Just completed a 5.00 km run - legs are toast!"
        );
    }

    #[test]
    fn test_threshold_two_chars_not_written() {
        let written = WrittenContentDetector::detect("Just completed a 3.10 mi run ok");
        assert_eq!(template_residue("Just completed a 3.10 mi run ok"), "ok");
        assert!(!written.is_user_written);
        assert_eq!(written.written_text, "");
    }

    #[test]
    fn test_threshold_three_chars_written() {
        let written = WrittenContentDetector::detect("Just completed a 3.10 mi run yay");
        assert!(written.is_user_written);
        assert_eq!(written.written_text, "Just completed a 3.10 mi run yay");
    }

    #[test]
    fn test_digits_count_punctuation_does_not() {
        assert!(!WrittenContentDetector::detect("Just completed a run 4!!!2").is_user_written);
        assert!(WrittenContentDetector::detect("Just completed a run 123").is_user_written);
    }

    #[test]
    fn test_empty_post() {
        assert_eq!(WrittenContentDetector::detect(""), WrittenContent::default());
    }

    #[test]
    fn test_tokens_match_whole_words_only() {
        // "sometimes" must not lose its "time"
        assert_eq!(template_residue("sometimes"), "sometimes");
        assert_eq!(template_residue("Just completed an elliptical workout"), "");
    }

    #[test]
    fn test_whole_word_anchoring() {
        assert_eq!(whole_word("run"), r"\brun\b");
        assert_eq!(whole_word("@runkeeper"), r"@runkeeper\b");
    }
}
