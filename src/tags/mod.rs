//! Tagging and matching module
//!
//! # Components
//!
//! - `vocabulary`: the four categories, their weights and closed vocabularies
//! - `tagset`: per-category tag lists
//! - `index`: the channel tag index (one JSON document)
//! - `extractor`: model-driven tag extraction and response parsing
//! - `matcher`: weighted overlap scoring and ranking
//! - `indexer`: one indexing pass over a block manifest

pub mod extractor;
pub mod index;
pub mod indexer;
pub mod matcher;
pub mod tagset;
pub mod vocabulary;

pub use extractor::{extract_tags, parse_tag_response, ExtractedTags};
pub use index::{ChannelIndex, TaggedBlock};
pub use matcher::{score_tags, ScoredBlock, TagMatcher, TagOverlap, EXPORT_LIMIT, TOP_MATCHES};
pub use tagset::CategoryTags;
pub use vocabulary::Category;
