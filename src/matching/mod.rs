//! Reference matcher: screenshot in, ranked and explained references out

pub mod explain;
pub mod pipeline;

pub use explain::{explain_matches, fallback_explanation, ExplanationInput};
pub use pipeline::{match_image, match_tags, MatchResponse, MatchResult};
