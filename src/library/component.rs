//! Extracted component schema (v2): renderable HTML/CSS plus light
//! classification metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::{Error, Result};
use crate::tags::extractor::parse_json_object;
use crate::tags::TaggedBlock;

pub const SCHEMA_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableCode {
    pub html: String,
    pub css: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Where a component was extracted from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub arena_id: i64,
    pub arena_url: String,
    pub image_url: String,
    pub title: Option<String>,
}

impl SourceInfo {
    pub fn from_block(block: &TaggedBlock) -> Option<Self> {
        Some(Self {
            arena_id: block.id,
            arena_url: block.arena_url.clone(),
            image_url: block.image_url.clone()?,
            title: block.title.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedComponent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub screen_type: String,
    pub component_types: Vec<String>,
    pub aesthetic_family: String,
    pub tags: Vec<String>,
    #[serde(rename = "render")]
    pub code: RenderableCode,
    pub source: SourceInfo,
    pub extracted_at: DateTime<Utc>,
    pub extraction_version: String,
}

/// Model output before defaults are applied
#[derive(Deserialize)]
struct RawExtraction {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    screen_type: Option<String>,
    #[serde(default)]
    component_types: Option<Vec<String>>,
    #[serde(default)]
    aesthetic_family: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    render: Option<RawRender>,
}

#[derive(Deserialize)]
struct RawRender {
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    css: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parse a screenshot-to-code response. `render.html` and `render.css` are
/// required; everything else falls back to a default.
pub fn parse_extraction(response: &str, source: SourceInfo) -> Result<ExtractedComponent> {
    let raw: RawExtraction = parse_json_object(response, "component")?;

    let render = raw
        .render
        .ok_or_else(|| Error::MalformedResponse("missing render.html or render.css".into()))?;
    let (Some(html), Some(css)) = (non_empty(render.html), non_empty(render.css)) else {
        return Err(Error::MalformedResponse(
            "missing render.html or render.css".into(),
        ));
    };

    Ok(ExtractedComponent {
        id: source.arena_id.to_string(),
        name: non_empty(raw.name).unwrap_or_else(|| "Untitled".to_string()),
        description: raw.description.unwrap_or_default(),
        screen_type: non_empty(raw.screen_type).unwrap_or_else(|| "other".to_string()),
        component_types: raw.component_types.unwrap_or_default(),
        aesthetic_family: non_empty(raw.aesthetic_family)
            .unwrap_or_else(|| "flat-minimal".to_string()),
        tags: raw.tags.unwrap_or_default(),
        code: RenderableCode {
            html,
            css,
            notes: non_empty(render.notes),
        },
        source,
        extracted_at: Utc::now(),
        extraction_version: SCHEMA_VERSION.to_string(),
    })
}

/// Aggregations over every component in the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentIndex {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub total_components: usize,
    pub by_aesthetic: BTreeMap<String, Vec<String>>,
    pub by_type: BTreeMap<String, Vec<String>>,
    pub by_screen: BTreeMap<String, Vec<String>>,
    pub components: Vec<String>,
}

impl ComponentIndex {
    pub fn build(components: &[ExtractedComponent]) -> Self {
        let mut index = Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            total_components: components.len(),
            by_aesthetic: BTreeMap::new(),
            by_type: BTreeMap::new(),
            by_screen: BTreeMap::new(),
            components: Vec::with_capacity(components.len()),
        };

        for c in components {
            index.components.push(c.id.clone());
            index
                .by_aesthetic
                .entry(c.aesthetic_family.clone())
                .or_default()
                .push(c.id.clone());
            for t in &c.component_types {
                index.by_type.entry(t.clone()).or_default().push(c.id.clone());
            }
            index
                .by_screen
                .entry(c.screen_type.clone())
                .or_default()
                .push(c.id.clone());
        }

        index
    }

    /// Aesthetic families present in the library, sorted.
    pub fn aesthetic_families(&self) -> Vec<&str> {
        self.by_aesthetic.keys().map(String::as_str).collect()
    }

    /// Component types present in the library, sorted.
    pub fn component_types(&self) -> Vec<&str> {
        self.by_type.keys().map(String::as_str).collect()
    }

    pub fn screen_types(&self) -> Vec<&str> {
        self.by_screen.keys().map(String::as_str).collect()
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats {
            total_components: self.total_components,
            aesthetics: counts(&self.by_aesthetic),
            types: counts(&self.by_type),
            generated_at: self.generated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total_components: usize,
    pub aesthetics: Vec<NameCount>,
    pub types: Vec<NameCount>,
    pub generated_at: DateTime<Utc>,
}

/// Count per key, largest first (ties keep key order).
fn counts(groups: &BTreeMap<String, Vec<String>>) -> Vec<NameCount> {
    let mut out: Vec<NameCount> = groups
        .iter()
        .map(|(name, ids)| NameCount {
            name: name.clone(),
            count: ids.len(),
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: i64) -> SourceInfo {
        SourceInfo {
            arena_id: id,
            arena_url: format!("https://www.are.na/block/{}", id),
            image_url: format!("https://img/{}.png", id),
            title: None,
        }
    }

    #[test]
    fn test_parse_applies_defaults() {
        let response = "Here you go:\n```json\n{\"render\": {\"html\": \"<div></div>\", \"css\": \".a{}\"}}\n```";
        let c = parse_extraction(response, source(7)).unwrap();

        assert_eq!(c.id, "7");
        assert_eq!(c.name, "Untitled");
        assert_eq!(c.screen_type, "other");
        assert_eq!(c.aesthetic_family, "flat-minimal");
        assert!(c.component_types.is_empty());
        assert_eq!(c.extraction_version, SCHEMA_VERSION);
        assert!(c.code.notes.is_none());
    }

    #[test]
    fn test_parse_requires_render_code() {
        let no_render = r#"{"name": "Card"}"#;
        let no_css = r#"{"name": "Card", "render": {"html": "<div></div>"}}"#;
        let empty_html = r#"{"render": {"html": "", "css": ".a{}"}}"#;

        for response in [no_render, no_css, empty_html] {
            let err = parse_extraction(response, source(1)).unwrap_err();
            assert!(matches!(err, Error::MalformedResponse(_)), "{}", response);
        }
    }

    #[test]
    fn test_render_field_name_on_disk() {
        let c = parse_extraction(
            r#"{"name": "Card", "render": {"html": "<b></b>", "css": "b{}", "notes": "icons"}}"#,
            source(3),
        )
        .unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["render"]["notes"], "icons");
        assert_eq!(json["source"]["arena_id"], 3);
    }

    fn component(id: &str, aesthetic: &str, screen: &str, types: &[&str]) -> ExtractedComponent {
        let mut c = parse_extraction(
            r#"{"render": {"html": "<div></div>", "css": "div{}"}}"#,
            source(id.parse().unwrap()),
        )
        .unwrap();
        c.aesthetic_family = aesthetic.into();
        c.screen_type = screen.into();
        c.component_types = types.iter().map(|s| s.to_string()).collect();
        c
    }

    #[test]
    fn test_build_index_and_stats() {
        let components = vec![
            component("1", "glass", "dashboard", &["card", "chart"]),
            component("2", "brutalist", "landing", &["hero"]),
            component("3", "glass", "dashboard", &["card"]),
        ];

        let index = ComponentIndex::build(&components);

        assert_eq!(index.total_components, 3);
        assert_eq!(index.components, vec!["1", "2", "3"]);
        assert_eq!(index.by_aesthetic["glass"], vec!["1", "3"]);
        assert_eq!(index.by_type["card"], vec!["1", "3"]);
        assert_eq!(index.by_screen["landing"], vec!["2"]);

        let stats = index.stats();
        assert_eq!(
            stats.aesthetics[0],
            NameCount { name: "glass".into(), count: 2 }
        );
        assert_eq!(stats.types[0].name, "card");
        assert_eq!(stats.types.len(), 3);
    }
}
