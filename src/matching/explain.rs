//! Human-readable relevance notes for ranked matches
//!
//! One model call per match, all in flight at once and joined before the
//! response is built. A failed call yields a fallback built from the
//! matched tag names; it never fails the batch.

use futures::future::join_all;

use crate::llm::{GenerativeModel, Prompt};
use crate::tags::{CategoryTags, TaggedBlock};

pub const DEFAULT_QUERY_DESCRIPTION: &str = "UI design";
pub const GENERIC_EXPLANATION: &str = "Related visual reference";

/// What an explanation is generated from
pub struct ExplanationInput<'a> {
    pub block: &'a TaggedBlock,
    pub matched: &'a CategoryTags,
}

fn explanation_prompt(query_description: &str, match_description: &str, matched_tags: &str) -> String {
    format!(
        "You are helping a designer understand why a reference image matches their work-in-progress.\n\n\
         Given:\n\
         - What they're building: \"{query_description}\"\n\
         - Reference description: \"{match_description}\"\n\
         - Overlapping qualities: {matched_tags}\n\n\
         Write ONE short sentence (max 12 words) explaining why this reference is relevant. \
         Describe the visual qualities they could borrow rather than naming the tags.\n\n\
         Output ONLY the explanation sentence, nothing else."
    )
}

/// "Similar a, b, c approach" from the first three matched tags.
pub fn fallback_explanation(matched: &CategoryTags) -> String {
    let tags = matched.flatten();
    if tags.is_empty() {
        GENERIC_EXPLANATION.to_string()
    } else {
        let head: Vec<&str> = tags.into_iter().take(3).collect();
        format!("Similar {} approach", head.join(", "))
    }
}

/// Trim and strip one wrapping quote on either side.
pub fn clean_explanation(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix(['"', '\''])
        .unwrap_or(trimmed);
    let trimmed = trimmed
        .strip_suffix(['"', '\''])
        .unwrap_or(trimmed);
    trimmed.trim().to_string()
}

async fn explain_one(model: &dyn GenerativeModel, query_description: &str, input: &ExplanationInput<'_>) -> String {
    let tags = input.matched.flatten().join(", ");
    let prompt = Prompt::text(explanation_prompt(query_description, &input.block.one_liner, &tags));

    match model.generate(&prompt).await {
        Ok(text) => {
            let cleaned = clean_explanation(&text);
            if cleaned.is_empty() {
                GENERIC_EXPLANATION.to_string()
            } else {
                cleaned
            }
        }
        Err(e) => {
            tracing::warn!("Explanation for block {} failed: {}", input.block.id, e);
            fallback_explanation(input.matched)
        }
    }
}

/// Explanations in the same order as `inputs`.
pub async fn explain_matches(
    model: &dyn GenerativeModel,
    query_one_liner: Option<&str>,
    inputs: &[ExplanationInput<'_>],
) -> Vec<String> {
    let query_description = query_one_liner.unwrap_or(DEFAULT_QUERY_DESCRIPTION);
    join_all(inputs.iter().map(|input| explain_one(model, query_description, input))).await
}
