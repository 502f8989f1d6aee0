//! Category classification
//!
//! Posts are classified by an ordered table of rules. Rules overlap, so the
//! first matching rule wins and the table order is the precedence contract.
//! Classification runs on the lower-cased raw text: template phrases such as
//! "just completed" must still be visible.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Category;

static LIVE_ACTIVITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bis\s+(running|biking|walking|skiing|swimming)\b").expect("valid live regex")
});

/// Phrases that mark an achievement post
const ACHIEVEMENT_PHRASES: [&str; 5] = [
    "new personal record",
    "pr!",
    "achieved",
    "set a goal",
    "achievement",
];

/// One classification rule: a predicate over lower-cased text and its category
pub struct CategoryRule {
    pub category: Category,
    pub matches: fn(&str) -> bool,
}

/// Rules in priority order; `Miscellaneous` is the fallthrough
pub static CATEGORY_RULES: [CategoryRule; 3] = [
    CategoryRule {
        category: Category::CompletedEvent,
        matches: is_completed_event,
    },
    CategoryRule {
        category: Category::LiveEvent,
        matches: is_live_event,
    },
    CategoryRule {
        category: Category::Achievement,
        matches: is_achievement,
    },
];

fn is_completed_event(lower: &str) -> bool {
    lower.starts_with("just completed")
        || lower.starts_with("i just ")
        || lower.contains(" completed a ")
        || lower.contains(" completed an ")
}

fn is_live_event(lower: &str) -> bool {
    lower.starts_with("just posted") || LIVE_ACTIVITY_RE.is_match(lower)
}

fn is_achievement(lower: &str) -> bool {
    ACHIEVEMENT_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// Classifier over the ordered rule table
pub struct Classifier;

impl Classifier {
    /// Classify raw post text. Total: unmatched text is `Miscellaneous`.
    pub fn classify(text: &str) -> Category {
        Self::classify_lower(&text.to_lowercase())
    }

    /// Classify text that is already lower-cased
    pub fn classify_lower(lower: &str) -> Category {
        CATEGORY_RULES
            .iter()
            .find(|rule| (rule.matches)(lower))
            .map(|rule| rule.category)
            .unwrap_or(Category::Miscellaneous)
    }
}
