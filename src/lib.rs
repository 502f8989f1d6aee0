//! Postflux - Classification and extraction engine for activity-tracker posts
//!
//! Postflux turns short social posts generated by an activity-tracking service
//! into structured records through a deterministic pipeline: normalization →
//! category classification → written-content detection → activity and
//! distance extraction.
//!
//! Every stage is a pure function of the post. Batches can be split across
//! threads freely; nothing is shared between posts.

pub mod activity;
pub mod classifier;
pub mod error;
pub mod feed;
pub mod normalizer;
pub mod pipeline;
pub mod renderer;
pub mod summary;
pub mod timestamp;
pub mod types;
pub mod written;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use activity::ActivityExtractor;
pub use classifier::Classifier;
pub use error::PostError;
pub use feed::PostFeed;
pub use normalizer::Normalizer;
pub use pipeline::{classify_json, classify_post, classify_posts, PostProcessor};
pub use renderer::{RowFormat, RowRenderer};
pub use summary::BatchSummary;
pub use types::{ActivityExtraction, Category, ClassifiedPost, Post, WrittenContent};
pub use written::WrittenContentDetector;

/// Postflux version
pub const POSTFLUX_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI and FFI
pub const PRODUCER_NAME: &str = "postflux";
