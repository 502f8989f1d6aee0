//! Post feed adapter
//!
//! Decodes feeds of `{text, created_at}` records delivered either as a JSON
//! array or as newline-delimited JSON. Extra fields on each record are ignored.

use serde::Serialize;

use crate::error::PostError;
use crate::timestamp::parse_created_at;
use crate::types::Post;

/// A feed record whose timestamp cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedIssue {
    /// 0-based position in the feed
    pub index: usize,
    /// The offending `created_at` value
    pub created_at: String,
}

impl FeedIssue {
    pub fn into_error(self) -> PostError {
        PostError::InvalidTimestamp {
            index: self.index,
            value: self.created_at,
        }
    }
}

/// Adapter for decoding post feeds
pub struct PostFeed;

impl PostFeed {
    /// Parse a JSON string containing an array of posts
    pub fn parse_array(json: &str) -> Result<Vec<Post>, PostError> {
        let posts: Vec<Post> = serde_json::from_str(json)?;
        tracing::debug!(posts = posts.len(), "parsed post array");
        Ok(posts)
    }

    /// Parse NDJSON (newline-delimited JSON) containing posts
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<Post>, PostError> {
        let mut posts = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                tracing::trace!(line = line_num + 1, "skipping blank line");
                continue;
            }
            match serde_json::from_str::<Post>(trimmed) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    return Err(PostError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        tracing::debug!(posts = posts.len(), "parsed post ndjson");
        Ok(posts)
    }

    /// Report every post whose `created_at` does not parse.
    ///
    /// Text is never validated: any string classifies.
    pub fn validate(posts: &[Post]) -> Vec<FeedIssue> {
        let issues: Vec<FeedIssue> = posts
            .iter()
            .enumerate()
            .filter(|(_, post)| parse_created_at(&post.created_at).is_none())
            .map(|(index, post)| FeedIssue {
                index,
                created_at: post.created_at.clone(),
            })
            .collect();

        if !issues.is_empty() {
            tracing::debug!(invalid = issues.len(), "feed has unparseable timestamps");
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_array() {
        let json = r#"[
            {"text": "Just completed a run", "created_at": "2012-03-01T10:00:00Z"},
            {"text": "Rest day", "created_at": "2012-03-02T10:00:00Z", "id_str": "99"}
        ]"#;
        let posts = PostFeed::parse_array(json).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1], Post::new("Rest day", "2012-03-02T10:00:00Z"));
    }

    #[test]
    fn test_parse_array_missing_field() {
        let result = PostFeed::parse_array(r#"[{"text": "no time"}]"#);
        assert!(matches!(result, Err(PostError::JsonError(_))));
    }

    #[test]
    fn test_parse_ndjson_skips_blank_lines() {
        let ndjson = "{\"text\": \"a\", \"created_at\": \"x\"}\n\n   \n{\"text\": \"b\", \"created_at\": \"y\"}\n";
        let posts = PostFeed::parse_ndjson(ndjson).unwrap();
        assert_eq!(
            posts,
            vec![Post::new("a", "x"), Post::new("b", "y")]
        );
    }

    #[test]
    fn test_parse_ndjson_reports_line_number() {
        let ndjson = "{\"text\": \"a\", \"created_at\": \"x\"}\n\nnot json\n";
        match PostFeed::parse_ndjson(ndjson) {
            Err(PostError::ParseError(msg)) => assert!(msg.contains("line 3"), "{msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_reports_bad_timestamps() {
        let posts = vec![
            Post::new("ok", "2012-03-01T10:00:00Z"),
            Post::new("bad", "not a date"),
            Post::new("", "Wed Oct 10 20:19:24 +0000 2018"),
            Post::new("empty", ""),
        ];
        let issues = PostFeed::validate(&posts);
        assert_eq!(
            issues,
            vec![
                FeedIssue {
                    index: 1,
                    created_at: "not a date".to_string()
                },
                FeedIssue {
                    index: 3,
                    created_at: String::new()
                },
            ]
        );

        let err = issues[0].clone().into_error();
        assert!(err.to_string().contains("Post 1"));
    }
}
