//! Export pack - reference images plus a design spec, as one ZIP
//!
//! Images are named ref-1.jpg, ref-2.jpg, ... by their position in the
//! reference list, so the spec document can point at them. A reference
//! whose image can't be fetched is still described, just without a file.

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::design_doc::{image_name, DesignDoc, DocEntry, DESIGN_DOC_NAME};
use crate::core::error::{Error, Result};
use crate::llm::image::ImageSource;
use crate::matching::MatchResponse;
use crate::tags::EXPORT_LIMIT;

/// The part of a block an export needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceBlock {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub arena_url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub one_liner: String,
}

impl ReferenceBlock {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackReference {
    pub block: ReferenceBlock,
    #[serde(default)]
    pub relevance_note: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub matches: Vec<PackReference>,
    #[serde(default)]
    pub query_one_liner: String,
    #[serde(default)]
    pub primary_id: Option<i64>,
}

impl ExportRequest {
    /// Build an export request straight from a match response.
    pub fn from_response(response: &MatchResponse, primary_id: Option<i64>) -> Self {
        let matches = response
            .matches
            .iter()
            .map(|m| PackReference {
                block: ReferenceBlock {
                    id: m.block.id,
                    title: m.block.title.clone(),
                    arena_url: m.block.arena_url.clone(),
                    image_url: m.block.image_url.clone(),
                    one_liner: m.block.one_liner.clone(),
                },
                relevance_note: m.explanation.clone(),
            })
            .collect();

        Self {
            matches,
            query_one_liner: response.one_liner.clone().unwrap_or_default(),
            primary_id,
        }
    }
}

/// A finished archive
#[derive(Debug)]
pub struct ExportPack {
    pub bytes: Vec<u8>,
    pub image_count: usize,
}

async fn fetch_reference_image(images: &dyn ImageSource, reference: &PackReference) -> Option<Vec<u8>> {
    let url = reference.block.image_url.as_deref()?;
    match images.fetch(url).await {
        Ok(image) => Some(image.bytes),
        Err(e) => {
            tracing::warn!("Failed to download image {}: {}", url, e);
            None
        }
    }
}

/// Download the (at most four) reference images concurrently and package
/// them with the design spec.
pub async fn build_pack(
    images: &dyn ImageSource,
    request: &ExportRequest,
    primary_guide: Option<&str>,
) -> Result<ExportPack> {
    if request.matches.is_empty() {
        return Err(Error::BadRequest("No matches provided".to_string()));
    }

    let references = &request.matches[..request.matches.len().min(EXPORT_LIMIT)];
    let downloads = join_all(references.iter().map(|r| fetch_reference_image(images, r))).await;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::with_capacity(references.len());
    let mut image_count = 0;

    for (i, (reference, download)) in references.iter().zip(downloads).enumerate() {
        let position = i + 1;
        let has_image = download.is_some();
        if let Some(bytes) = download {
            zip.start_file(image_name(position), options)?;
            zip.write_all(&bytes)?;
            image_count += 1;
        }
        entries.push(DocEntry {
            position,
            reference,
            has_image,
        });
    }

    let doc = DesignDoc {
        query_one_liner: &request.query_one_liner,
        primary_id: request.primary_id,
        entries,
        primary_guide,
        generated_at: Utc::now(),
    };

    zip.start_file(DESIGN_DOC_NAME, options)?;
    zip.write_all(doc.render().as_bytes())?;

    let bytes = zip.finish()?.into_inner();
    tracing::info!(
        "Export pack: {} images, {} bytes",
        image_count,
        bytes.len()
    );

    Ok(ExportPack { bytes, image_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::image::DownloadedImage;
    use async_trait::async_trait;
    use std::io::Read;
    use zip::ZipArchive;

    /// Serves the URL back as bytes; URLs containing "404" fail
    struct EchoImages;

    #[async_trait]
    impl ImageSource for EchoImages {
        async fn fetch(&self, url: &str) -> Result<DownloadedImage> {
            if url.contains("404") {
                return Err(Error::NotFound {
                    kind: "image",
                    name: url.to_string(),
                });
            }
            Ok(DownloadedImage {
                bytes: url.as_bytes().to_vec(),
                mime_type: "image/jpeg".into(),
            })
        }
    }

    fn reference(id: i64, image_url: Option<&str>) -> PackReference {
        PackReference {
            block: ReferenceBlock {
                id,
                title: Some(format!("Block {}", id)),
                arena_url: format!("https://www.are.na/block/{}", id),
                image_url: image_url.map(String::from),
                one_liner: String::new(),
            },
            relevance_note: format!("note {}", id),
        }
    }

    fn names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_pack_truncates_to_four() {
        let request = ExportRequest {
            matches: (1..=6).map(|id| reference(id, Some("https://img/ok.jpg"))).collect(),
            query_one_liner: "Dashboard".into(),
            primary_id: None,
        };

        let pack = build_pack(&EchoImages, &request, None).await.unwrap();

        assert_eq!(pack.image_count, 4);
        assert_eq!(
            names(&pack.bytes),
            vec!["DESIGN-SPEC.md", "ref-1.jpg", "ref-2.jpg", "ref-3.jpg", "ref-4.jpg"]
        );
    }

    #[tokio::test]
    async fn test_failed_download_only_drops_its_image() {
        let request = ExportRequest {
            matches: vec![
                reference(1, Some("https://img/a.jpg")),
                reference(2, Some("https://img/404.jpg")),
                reference(3, None),
                reference(4, Some("https://img/d.jpg")),
            ],
            query_one_liner: "Landing page".into(),
            primary_id: Some(4),
        };

        let pack = build_pack(&EchoImages, &request, Some("## Guide\nbody")).await.unwrap();

        assert_eq!(pack.image_count, 2);
        assert_eq!(names(&pack.bytes), vec!["DESIGN-SPEC.md", "ref-1.jpg", "ref-4.jpg"]);

        let mut archive = ZipArchive::new(Cursor::new(pack.bytes.as_slice())).unwrap();
        let mut image = Vec::new();
        archive.by_name("ref-4.jpg").unwrap().read_to_end(&mut image).unwrap();
        assert_eq!(image, b"https://img/d.jpg");

        let mut doc = String::new();
        archive.by_name(DESIGN_DOC_NAME).unwrap().read_to_string(&mut doc).unwrap();
        assert!(doc.contains("### 2. Block 2"));
        assert!(doc.contains("Follow **Block 4** (`ref-4.jpg`)"));
        assert!(doc.contains("## Guide"));
    }

    #[tokio::test]
    async fn test_empty_request_is_rejected() {
        let err = build_pack(&EchoImages, &ExportRequest::default(), None).await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "No matches provided");
    }

    #[test]
    fn test_parse_site_request() {
        let json = r#"{
            "matches": [{"block": {"id": 5, "title": null, "arena_url": "u", "image_url": "i", "one_liner": "o", "tags": {}}, "relevanceNote": "why"}],
            "queryOneLiner": "q",
            "primaryId": null
        }"#;
        let request: ExportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.matches[0].block.id, 5);
        assert_eq!(request.matches[0].relevance_note, "why");
        assert!(request.primary_id.is_none());
    }
}
