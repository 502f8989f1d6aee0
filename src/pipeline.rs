//! Pipeline orchestration
//!
//! This module provides the public API for Postflux.
//! It runs each post through normalization, classification, written-content
//! detection and activity extraction, producing one immutable record per post.

use crate::activity::ActivityExtractor;
use crate::classifier::Classifier;
use crate::error::PostError;
use crate::feed::PostFeed;
use crate::normalizer::Normalizer;
use crate::renderer::{RowFormat, RowRenderer};
use crate::summary::BatchSummary;
use crate::timestamp::parse_created_at;
use crate::types::{ClassifiedPost, Post};
use crate::written::WrittenContentDetector;

/// Classify a single post.
///
/// Pipeline stages:
/// 1. Normalizer - Strip tags, URLs and attribution
/// 2. Classifier - Category from the lower-cased raw text
/// 3. WrittenContentDetector - Author commentary from the normalized text
/// 4. ActivityExtractor - Activity and distance for completed events
pub fn classify_post(post: &Post) -> ClassifiedPost {
    let normalized_text = Normalizer::normalize(&post.text);
    let category = Classifier::classify(&post.text);
    let written = WrittenContentDetector::detect_normalized(&normalized_text);
    let activity = ActivityExtractor::extract(&normalized_text, category);

    tracing::trace!(
        category = %category,
        user_written = written.is_user_written,
        activity = %activity.activity_type,
        "classified post"
    );

    ClassifiedPost {
        text: post.text.clone(),
        created_at: post.created_at.clone(),
        timestamp: parse_created_at(&post.created_at),
        normalized_text,
        category,
        is_user_written: written.is_user_written,
        written_text: written.written_text,
        activity_type: activity.activity_type,
        distance_miles: activity.distance_miles,
    }
}

/// Classify a batch of posts, preserving input order
pub fn classify_posts(posts: &[Post]) -> Vec<ClassifiedPost> {
    tracing::debug!(posts = posts.len(), "classifying batch");
    posts.iter().map(classify_post).collect()
}

/// Classify a JSON array of posts and return a JSON array of records
pub fn classify_json(posts_json: &str) -> Result<String, PostError> {
    let posts = PostFeed::parse_array(posts_json)?;
    let records = classify_posts(&posts);
    serde_json::to_string(&records).map_err(|e| PostError::EncodingError(e.to_string()))
}

/// Batch processor bundling classification, rendering and summaries
#[derive(Debug, Clone, Default)]
pub struct PostProcessor {
    row_format: RowFormat,
}

impl PostProcessor {
    /// Create a processor rendering Markdown rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with a specific row format
    pub fn with_row_format(row_format: RowFormat) -> Self {
        Self { row_format }
    }

    /// Classify a batch of posts
    pub fn classify(&self, posts: &[Post]) -> Vec<ClassifiedPost> {
        classify_posts(posts)
    }

    /// Render records as rows numbered by their position in the slice
    pub fn render_rows(&self, records: &[ClassifiedPost]) -> Vec<String> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| RowRenderer::render_row_as(record, index, self.row_format))
            .collect()
    }

    /// Summarize a batch of records
    pub fn summarize(&self, records: &[ClassifiedPost]) -> BatchSummary {
        BatchSummary::from_posts(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_completed_template_post() {
        let post = Post::new(
            "Just completed a 3.10 mi run with @RunKeeper. Check it out! http://rnkpr.com/abc #RunKeeper",
            "Thu Mar 01 10:15:00 +0000 2012",
        );
        let record = classify_post(&post);

        assert_eq!(record.category, Category::CompletedEvent);
        assert!(!record.is_user_written);
        assert_eq!(record.written_text, "");
        assert_eq!(record.activity_type, "running");
        assert!((record.distance_miles - 3.1).abs() < 1e-9);
        assert!(record.timestamp.is_some());
    }

    #[test]
    fn test_url_does_not_leak_into_activity() {
        // The link path spells "ride" but only the prose counts
        let post = Post::new(
            "Just completed a yoga class http://example.com/ride",
            "2012-03-01T10:00:00Z",
        );
        assert_eq!(classify_post(&post).activity_type, "yoga");
    }

    #[test]
    fn test_live_event_has_no_activity() {
        let record = classify_post(&Post::new("is running a marathon today!", "2012-03-01T10:00:00Z"));
        assert_eq!(record.category, Category::LiveEvent);
        assert_eq!(record.activity_type, "unknown");
        assert_eq!(record.distance_miles, 0.0);
    }

    #[test]
    fn test_empty_post_degrades_gracefully() {
        let record = classify_post(&Post::new("", ""));
        assert_eq!(record.category, Category::Miscellaneous);
        assert!(!record.is_user_written);
        assert_eq!(record.activity_type, "unknown");
        assert_eq!(record.distance_miles, 0.0);
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn test_invalid_timestamp_does_not_affect_classification() {
        let good = classify_post(&Post::new("Just completed a 2 mi walk", "2012-03-01T10:00:00Z"));
        let bad = classify_post(&Post::new("Just completed a 2 mi walk", "not a time"));

        assert!(bad.timestamp.is_none());
        assert_eq!(good.category, bad.category);
        assert_eq!(good.activity_type, bad.activity_type);
        assert_eq!(good.distance_miles, bad.distance_miles);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let post = Post::new("Just completed a 5k run and bike ride", "2012-03-01T10:00:00Z");
        assert_eq!(classify_post(&post), classify_post(&post));
        assert_eq!(classify_post(&post).activity_type, "running");
    }

    #[test]
    fn test_batch_preserves_order() {
        let posts = vec![
            Post::new("Rest day", "2012-03-03T10:00:00Z"),
            Post::new("Just completed a run", "2012-03-01T10:00:00Z"),
        ];
        let records = classify_posts(&posts);
        assert_eq!(records[0].text, "Rest day");
        assert_eq!(records[1].text, "Just completed a run");
    }

    #[test]
    fn test_classify_json_round_trip() {
        let json = r#"[{"text": "Got a PR! today", "created_at": "2012-03-01T10:00:00Z"}]"#;
        let output = classify_json(json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[0]["category"], "achievement");
        assert_eq!(value[0]["activity_type"], "unknown");
        let ts = value[0]["timestamp"].as_str().unwrap();
        assert_eq!(
            parse_created_at(ts),
            parse_created_at("2012-03-01T10:00:00Z")
        );
    }

    #[test]
    fn test_huge_distance_record_survives_json() {
        let text = format!("Just completed a {} mi run", "9".repeat(400));
        let record = classify_post(&Post::new(text, "2012-03-01T10:00:00Z"));
        assert_eq!(record.distance_miles, 0.0);

        let json = serde_json::to_string(&record).unwrap();
        let back: ClassifiedPost = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_classify_json_invalid() {
        assert!(classify_json("not valid json").is_err());
    }

    #[test]
    fn test_processor_renders_numbered_rows() {
        let processor = PostProcessor::with_row_format(RowFormat::Markdown);
        let records = processor.classify(&[
            Post::new("Rest day", "2012-03-03T10:00:00Z"),
            Post::new("Rain again", "2012-03-04T10:00:00Z"),
        ]);
        let rows = processor.render_rows(&records);
        assert_eq!(rows, vec!["1. Rest day", "2. Rain again"]);

        let summary = processor.summarize(&records);
        assert_eq!(summary.total_posts, 2);
        assert_eq!(summary.user_written, 2);
    }

    #[test]
    fn test_records_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClassifiedPost>();
        assert_send_sync::<PostProcessor>();
    }
}
