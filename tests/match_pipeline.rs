//! End-to-end matching against an index on disk, with a scripted model.

use async_trait::async_trait;
use chrono::Utc;
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};

use refmatch::core::config::Config;
use refmatch::core::paths::ProjectPaths;
use refmatch::export::{build_pack, ExportRequest};
use refmatch::llm::image::{DownloadedImage, ImageSource};
use refmatch::llm::{GenerativeModel, InlineImage, Prompt};
use refmatch::matching::match_image;
use refmatch::tags::{CategoryTags, ChannelIndex, TaggedBlock};
use refmatch::{Error, Result};

/// Tags every image the same way; explanation calls fail for block titles
/// containing "flaky".
struct ScriptedModel {
    explanation_calls: AtomicUsize,
}

impl ScriptedModel {
    fn new() -> Self {
        Self {
            explanation_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        if prompt.image.is_some() {
            return Ok(r#"Sure!
```json
{
  "component": ["dashboard", "cards", "charts"],
  "style": ["dark-mode", "rounded"],
  "context": ["fintech"],
  "vibe": ["calm", "made-up-vibe"],
  "one_liner": "Dark fintech dashboard with rounded metric cards"
}
```"#
                .to_string());
        }
        self.explanation_calls.fetch_add(1, Ordering::SeqCst);
        if prompt.text.contains("flaky") {
            return Err(Error::Model("503 Service Unavailable".into()));
        }
        Ok("\"Same rounded card grid on a dark canvas\"".to_string())
    }
}

struct StubImages;

#[async_trait]
impl ImageSource for StubImages {
    async fn fetch(&self, url: &str) -> Result<DownloadedImage> {
        if url.contains("missing") {
            return Err(Error::NotFound {
                kind: "image",
                name: url.to_string(),
            });
        }
        Ok(DownloadedImage {
            bytes: vec![0xFF, 0xD8, 0xFF],
            mime_type: "image/jpeg".into(),
        })
    }
}

fn tags(component: &[&str], style: &[&str], context: &[&str], vibe: &[&str]) -> CategoryTags {
    let own = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
    CategoryTags {
        component: own(component),
        style: own(style),
        context: own(context),
        vibe: own(vibe),
    }
}

fn block(id: i64, title: &str, tags: CategoryTags, image: &str) -> TaggedBlock {
    TaggedBlock {
        id,
        title: Some(title.to_string()),
        arena_url: format!("https://www.are.na/block/{}", id),
        image_url: Some(format!("https://images.are.na/{}", image)),
        tags,
        one_liner: format!("{} reference", title),
        indexed_at: Utc::now(),
    }
}

fn sample_index() -> ChannelIndex {
    let mut index = ChannelIndex::new("ui-ux-uqgmlf-rw1i", "UI / UX");
    index.blocks = vec![
        // 3 + 3 + 1.5 + 1.5 + 2 + 1 = 12
        block(
            101,
            "Wealth app",
            tags(&["dashboard", "cards"], &["dark-mode", "rounded"], &["fintech"], &["calm"]),
            "101.jpg",
        ),
        // 3 + 2 = 5
        block(102, "flaky charts", tags(&["charts"], &[], &["fintech"], &[]), "102.jpg"),
        // no overlap
        block(103, "Recipe blog", tags(&["list"], &["serif"], &["food"], &["warm"]), "103.jpg"),
        // 1.5
        block(104, "Rounded form", tags(&["form"], &["rounded"], &[], &[]), "missing.jpg"),
    ];
    index
}

fn screenshot() -> InlineImage {
    InlineImage::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap()
}

#[tokio::test]
async fn matches_are_ranked_and_explained() {
    let model = ScriptedModel::new();

    let response = match_image(&model, &sample_index(), screenshot()).await.unwrap();

    let ranked: Vec<(i64, f64)> = response
        .matches
        .iter()
        .map(|m| (m.block.id, m.score))
        .collect();
    assert_eq!(ranked, vec![(101, 12.0), (102, 5.0), (104, 1.5)]);
    assert_eq!(response.total_indexed, 4);

    // Unknown vocabulary is dropped before scoring
    assert_eq!(response.extracted_tags.tags.vibe, vec!["calm"]);

    assert_eq!(
        response.matches[0].explanation,
        "Same rounded card grid on a dark canvas"
    );
    // A failed explanation falls back without affecting its neighbours
    assert_eq!(response.matches[1].explanation, "Similar charts, fintech approach");
    assert_eq!(
        response.matches[2].explanation,
        "Same rounded card grid on a dark canvas"
    );
    assert_eq!(model.explanation_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn index_is_read_from_the_dev_location_when_needed() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ProjectPaths::from_root_with_config(dir.path().join("web"), Config::default());
    sample_index().save(&paths.dev_index).unwrap();

    let index = paths.load_index().unwrap();
    let response = match_image(&ScriptedModel::new(), &index, screenshot()).await.unwrap();

    assert_eq!(response.matches.len(), 3);
}

#[tokio::test]
async fn match_response_exports_to_a_pack() {
    let response = match_image(&ScriptedModel::new(), &sample_index(), screenshot())
        .await
        .unwrap();
    let request = ExportRequest::from_response(&response, Some(101));

    let pack = build_pack(&StubImages, &request, Some("## Wealth App\nUse 20px radius."))
        .await
        .unwrap();

    // Block 104's image download fails; its entry stays in the doc
    assert_eq!(pack.image_count, 2);
    let mut archive = zip::ZipArchive::new(Cursor::new(pack.bytes)).unwrap();
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    assert_eq!(names, vec!["DESIGN-SPEC.md", "ref-1.jpg", "ref-2.jpg"]);

    let mut doc = String::new();
    archive
        .by_name("DESIGN-SPEC.md")
        .unwrap()
        .read_to_string(&mut doc)
        .unwrap();
    assert!(doc.contains("Dark fintech dashboard with rounded metric cards"));
    assert!(doc.contains("### 3. Rounded form"));
    assert!(doc.contains("Use 20px radius."));
}
