//! Reference matching pipeline
//!
//! 1. Extract tags from the screenshot
//! 2. Score every indexed block by weighted tag overlap
//! 3. Keep the top matches (score > 0, highest first)
//! 4. Explain each match, concurrently
//! 5. Assemble the response

use serde::{Deserialize, Serialize};

use super::explain::{explain_matches, ExplanationInput};
use crate::core::error::Result;
use crate::llm::{GenerativeModel, InlineImage};
use crate::tags::{extract_tags, CategoryTags, ChannelIndex, ExtractedTags, TagMatcher, TaggedBlock};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub block: TaggedBlock,
    pub score: f64,
    pub matched_tags: CategoryTags,
    #[serde(rename = "relevanceNote")]
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub extracted_tags: ExtractedTags,
    pub one_liner: Option<String>,
    pub matches: Vec<MatchResult>,
    pub total_indexed: usize,
}

/// Rank and explain index blocks for already extracted query tags.
pub async fn match_tags(
    model: &dyn GenerativeModel,
    matcher: &TagMatcher,
    index: &ChannelIndex,
    extracted: ExtractedTags,
) -> MatchResponse {
    let ranked = matcher.rank(&extracted.tags, &index.blocks);
    tracing::debug!("{} of {} blocks matched", ranked.len(), index.len());

    let inputs: Vec<ExplanationInput<'_>> = ranked
        .iter()
        .map(|r| ExplanationInput {
            block: r.block,
            matched: &r.matched,
        })
        .collect();
    let explanations = explain_matches(model, extracted.one_liner.as_deref(), &inputs).await;

    let matches = ranked
        .into_iter()
        .zip(explanations)
        .map(|(r, explanation)| MatchResult {
            block: r.block.clone(),
            score: r.score,
            matched_tags: r.matched,
            explanation,
        })
        .collect();

    MatchResponse {
        one_liner: extracted.one_liner.clone(),
        extracted_tags: extracted,
        matches,
        total_indexed: index.len(),
    }
}

/// Full pipeline for one screenshot.
pub async fn match_image(
    model: &dyn GenerativeModel,
    index: &ChannelIndex,
    image: InlineImage,
) -> Result<MatchResponse> {
    let extracted = extract_tags(model, image).await?;
    tracing::info!(
        "Extracted {} tags: {}",
        extracted.tags.len(),
        extracted.one_liner.as_deref().unwrap_or("(no summary)")
    );
    Ok(match_tags(model, &TagMatcher::new(), index, extracted).await)
}
