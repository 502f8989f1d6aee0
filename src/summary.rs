//! Batch summaries
//!
//! Folds classified posts into counts a listing or chart needs: posts per
//! category, activity frequencies, total distance and the covered time span.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Category, ClassifiedPost};

/// Aggregate view over a batch of classified posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of posts folded in
    pub total_posts: usize,
    /// Posts per category (every category present, possibly 0)
    pub categories: BTreeMap<Category, usize>,
    /// Posts with author commentary
    pub user_written: usize,
    /// Completed events per activity label
    pub activity_frequencies: BTreeMap<String, usize>,
    /// Sum of completed-event distances (miles)
    pub total_distance_miles: f64,
    /// Oldest valid creation time
    pub earliest: Option<DateTime<FixedOffset>>,
    /// Newest valid creation time
    pub latest: Option<DateTime<FixedOffset>>,
    /// Posts whose creation time did not parse
    pub invalid_timestamps: usize,
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self {
            total_posts: 0,
            categories: Category::ALL.iter().map(|c| (*c, 0)).collect(),
            user_written: 0,
            activity_frequencies: BTreeMap::new(),
            total_distance_miles: 0.0,
            earliest: None,
            latest: None,
            invalid_timestamps: 0,
        }
    }
}

impl BatchSummary {
    /// Summarize a batch of classified posts
    pub fn from_posts(posts: &[ClassifiedPost]) -> Self {
        let mut summary = Self::default();
        for post in posts {
            summary.add(post);
        }
        summary
    }

    /// Fold one post into the summary
    pub fn add(&mut self, post: &ClassifiedPost) {
        self.total_posts += 1;
        *self.categories.entry(post.category).or_insert(0) += 1;

        if post.is_user_written {
            self.user_written += 1;
        }

        if post.category == Category::CompletedEvent {
            *self
                .activity_frequencies
                .entry(post.activity_type.clone())
                .or_insert(0) += 1;
            self.total_distance_miles += post.distance_miles;
        }

        match post.timestamp {
            Some(ts) => {
                if self.earliest.map_or(true, |e| ts < e) {
                    self.earliest = Some(ts);
                }
                if self.latest.map_or(true, |l| ts > l) {
                    self.latest = Some(ts);
                }
            }
            None => self.invalid_timestamps += 1,
        }
    }

    /// Posts in a category
    pub fn count(&self, category: Category) -> usize {
        self.categories.get(&category).copied().unwrap_or(0)
    }

    /// Activity labels ordered by frequency (descending), ties by label
    pub fn ranked_activities(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .activity_frequencies
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}
