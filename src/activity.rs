//! Activity and distance extraction
//!
//! Only completed-event posts carry an activity. The activity label comes from
//! an ordered alias table where the first matching label wins, so a post that
//! mentions both a run and a ride resolves to `running`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{ActivityExtraction, Category, UNKNOWN_ACTIVITY};

/// Kilometres per mile. The exact international mile, not the rounded 1.609:
/// 10 km must come out at 6.214 mi within 0.001.
pub const KM_PER_MILE: f64 = 1.609344;

/// Canonical activity labels and their aliases, in priority order
pub const ACTIVITY_ALIASES: [(&str, &[&str]); 7] = [
    ("running", &["run", "jog", "jogging"]),
    ("walking", &["walk", "hike", "hiking"]),
    ("cycling", &["bike", "biked", "biking", "ride", "rode", "cycling"]),
    ("swimming", &["swim", "swam", "swimming"]),
    ("elliptical", &["elliptical"]),
    ("rowing", &["row", "rowing"]),
    ("yoga", &["yoga"]),
];

/// Compiled alias table, same order as `ACTIVITY_ALIASES`
static ALIAS_RES: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    ACTIVITY_ALIASES
        .iter()
        .map(|(label, aliases)| {
            let res = aliases
                .iter()
                .map(|alias| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(alias)))
                        .expect("valid alias regex")
                })
                .collect();
            (*label, res)
        })
        .collect()
});

static FALLBACK_ACTIVITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bcompleted (?:a|an) (\w+)").expect("valid fallback regex"));

static MILES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d*\.?\d+)\s+(?:mi|mile|miles)\b").expect("valid miles regex")
});

static KILOMETERS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d*\.?\d+)\s*(?:km|kilometer|kilometers)\b").expect("valid km regex")
});

/// Extractor for activity labels and distances
pub struct ActivityExtractor;

impl ActivityExtractor {
    /// Extract the activity for a post of the given category.
    ///
    /// Anything other than a completed event yields `unknown` and 0 miles.
    pub fn extract(text: &str, category: Category) -> ActivityExtraction {
        if category != Category::CompletedEvent {
            return ActivityExtraction::unknown();
        }

        let lower = text.to_lowercase();
        ActivityExtraction {
            activity_type: resolve_activity(&lower),
            distance_miles: resolve_distance_miles(&lower),
        }
    }
}

/// Resolve the activity label from lower-cased text
pub fn resolve_activity(lower: &str) -> String {
    let canonical = ALIAS_RES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|re| re.is_match(lower)))
        .map(|(label, _)| *label);

    if let Some(label) = canonical {
        return label.to_string();
    }

    FALLBACK_ACTIVITY_RE
        .captures(lower)
        .and_then(|caps| caps.get(1))
        .map(|word| word.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_ACTIVITY.to_string())
}

/// Resolve the distance in miles from lower-cased text, 0 when absent
pub fn resolve_distance_miles(lower: &str) -> f64 {
    if let Some(miles) = capture_number(&MILES_RE, lower) {
        return miles;
    }
    if let Some(km) = capture_number(&KILOMETERS_RE, lower) {
        return km / KM_PER_MILE;
    }
    0.0
}

fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
