//! Tag extractor - ask the model to tag a screenshot
//!
//! Model output is free text. The JSON object is taken from a fenced code
//! block when there is one, otherwise from the first `{` to the last `}`.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::tagset::CategoryTags;
use super::vocabulary::tag_prompt;
use crate::core::error::{Error, Result};
use crate::llm::{GenerativeModel, InlineImage, Prompt};

lazy_static::lazy_static! {
    static ref FENCED_RE: Regex = Regex::new(r"```(?:json)?\s*([\s\S]*?)```").unwrap();
}

/// Tags and summary the model produced for one screenshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTags {
    #[serde(flatten)]
    pub tags: CategoryTags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_liner: Option<String>,
}

/// Find the JSON object inside a model response.
pub fn locate_json_object(text: &str) -> Option<&str> {
    let scope = FENCED_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|s| s.contains('{'))
        .unwrap_or(text);

    let start = scope.find('{')?;
    let end = scope.rfind('}')?;
    (end > start).then(|| &scope[start..=end])
}

/// Locate and deserialize the JSON object in a model response.
pub fn parse_json_object<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    let json = locate_json_object(text)
        .ok_or_else(|| Error::MalformedResponse(format!("no JSON object in {} response", what)))?;
    serde_json::from_str(json)
        .map_err(|e| Error::MalformedResponse(format!("invalid {} JSON: {}", what, e)))
}

/// Parse a tagging response, keeping only vocabulary tags.
pub fn parse_tag_response(text: &str) -> Result<ExtractedTags> {
    let mut extracted: ExtractedTags = parse_json_object(text, "tag")?;

    let dropped = extracted.tags.retain_known();
    if dropped > 0 {
        tracing::debug!("Dropped {} tags outside the vocabulary", dropped);
    }

    extracted.one_liner = extracted
        .one_liner
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(extracted)
}

/// Run the tagging prompt against one image.
pub async fn extract_tags(model: &dyn GenerativeModel, image: InlineImage) -> Result<ExtractedTags> {
    let response = model.generate(&Prompt::with_image(tag_prompt(), image)).await?;
    parse_tag_response(&response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_json() {
        let text = r#"Here you go: {"component": ["dashboard"], "one_liner": "A dashboard"} Hope that helps"#;
        let extracted = parse_tag_response(text).unwrap();
        assert_eq!(extracted.tags.component, vec!["dashboard"]);
        assert_eq!(extracted.one_liner.as_deref(), Some("A dashboard"));
    }

    #[test]
    fn test_fenced_json() {
        let text = "Sure!\n```json\n{\"style\": [\"dark-mode\", \"neon\"], \"vibe\": [\"edgy\"]}\n```\nNote: {braces} later";
        let extracted = parse_tag_response(text).unwrap();
        assert_eq!(extracted.tags.style, vec!["dark-mode", "neon"]);
        assert_eq!(extracted.tags.vibe, vec!["edgy"]);
        assert!(extracted.one_liner.is_none());
    }

    #[test]
    fn test_fence_without_object_falls_back_to_text() {
        let text = "```\nno json here\n```\n{\"context\": [\"saas\"]}";
        let extracted = parse_tag_response(text).unwrap();
        assert_eq!(extracted.tags.context, vec!["saas"]);
    }

    #[test]
    fn test_no_json_is_malformed() {
        let err = parse_tag_response("I cannot see an image.").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_broken_json_is_malformed() {
        let err = parse_tag_response(r#"{"component": ["hero",]}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_unknown_tags_dropped() {
        let extracted =
            parse_tag_response(r#"{"component": ["hero", "carousel"], "one_liner": "  "}"#).unwrap();
        assert_eq!(extracted.tags.component, vec!["hero"]);
        assert!(extracted.one_liner.is_none());
    }

    #[test]
    fn test_serialized_shape_is_flat() {
        let extracted = parse_tag_response(r#"{"vibe": ["calm"], "one_liner": "x"}"#).unwrap();
        let json = serde_json::to_value(&extracted).unwrap();
        assert_eq!(json["vibe"][0], "calm");
        assert_eq!(json["one_liner"], "x");
        assert!(json["component"].as_array().unwrap().is_empty());
    }
}
