//! Core types for the Postflux pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw posts in, per-stage results, and the classified record out.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Activity label used whenever no activity applies or none was recognized
pub const UNKNOWN_ACTIVITY: &str = "unknown";

/// A raw post as delivered by the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post body, possibly with quotes, hashtags and URLs
    pub text: String,
    /// Creation time as the feed supplied it
    pub created_at: String,
}

impl Post {
    pub fn new(text: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: created_at.into(),
        }
    }
}

/// Post category - exactly one per post
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CompletedEvent,
    LiveEvent,
    Achievement,
    Miscellaneous,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; 4] = [
        Category::CompletedEvent,
        Category::LiveEvent,
        Category::Achievement,
        Category::Miscellaneous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::CompletedEvent => "completed_event",
            Category::LiveEvent => "live_event",
            Category::Achievement => "achievement",
            Category::Miscellaneous => "miscellaneous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of written-content detection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WrittenContent {
    /// Whether the poster added commentary beyond the template
    pub is_user_written: bool,
    /// Normalized post text when user-written, empty otherwise
    pub written_text: String,
}

/// Result of activity and distance extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityExtraction {
    /// Canonical activity label, a raw captured word, or `unknown`
    pub activity_type: String,
    /// Distance in miles, 0 when absent
    pub distance_miles: f64,
}

impl ActivityExtraction {
    /// Extraction for posts that carry no activity
    pub fn unknown() -> Self {
        Self {
            activity_type: UNKNOWN_ACTIVITY.to_string(),
            distance_miles: 0.0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.activity_type == UNKNOWN_ACTIVITY
    }
}

impl Default for ActivityExtraction {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Fully classified post - computed once, never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPost {
    /// Original post text
    pub text: String,
    /// Original creation time string
    pub created_at: String,
    /// Parsed creation time, `None` when the feed value does not parse
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// Text after boilerplate removal
    pub normalized_text: String,
    /// Post category
    pub category: Category,
    /// Whether the poster added commentary
    pub is_user_written: bool,
    /// Commentary text (normalized), empty unless user-written
    pub written_text: String,
    /// Activity label for completed events, `unknown` otherwise
    pub activity_type: String,
    /// Distance in miles for completed events, 0 otherwise
    pub distance_miles: f64,
}

impl ClassifiedPost {
    /// Text shown for this post in a listing
    pub fn snippet(&self) -> &str {
        if self.is_user_written {
            &self.written_text
        } else {
            &self.normalized_text
        }
    }
}
