//! Indexing pass - tag every block of a channel and build its index
//!
//! Blocks come from a manifest file rather than from the curation service.
//! Each block is tagged independently; failures are counted and skipped.

use chrono::Utc;
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};

use super::extractor::extract_tags;
use super::index::{ChannelIndex, TaggedBlock};
use crate::core::error::Result;
use crate::llm::image::ImageSource;
use crate::llm::{GenerativeModel, InlineImage};

/// Pause between model calls
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

/// Canonical page URL of a block on the curation service
pub fn block_url(id: i64) -> String {
    format!("https://www.are.na/block/{}", id)
}

/// One entry of a block manifest
#[derive(Debug, Clone, Deserialize)]
pub struct BlockSource {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub arena_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl BlockSource {
    pub fn arena_url(&self) -> String {
        self.arena_url.clone().unwrap_or_else(|| block_url(self.id))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Manifest {
    List(Vec<BlockSource>),
    Wrapped { blocks: Vec<BlockSource> },
}

/// Read a manifest: either a bare array of blocks or `{"blocks": [...]}`.
pub fn load_manifest(path: &Path) -> Result<Vec<BlockSource>> {
    let data = std::fs::read_to_string(path)?;
    Ok(match serde_json::from_str(&data)? {
        Manifest::List(blocks) => blocks,
        Manifest::Wrapped { blocks } => blocks,
    })
}

#[derive(Debug, Default, Clone)]
pub struct IndexStats {
    pub indexed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

pub struct Indexer<'a> {
    model: &'a dyn GenerativeModel,
    images: &'a dyn ImageSource,
    delay: Duration,
}

impl<'a> Indexer<'a> {
    pub fn new(model: &'a dyn GenerativeModel, images: &'a dyn ImageSource) -> Self {
        Self {
            model,
            images,
            delay: DEFAULT_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Tag up to `limit` blocks and return a fresh index.
    pub async fn run(
        &self,
        channel_slug: &str,
        channel_title: &str,
        blocks: &[BlockSource],
        limit: Option<usize>,
    ) -> (ChannelIndex, IndexStats) {
        let start = Instant::now();
        let mut index = ChannelIndex::new(channel_slug, channel_title);
        let mut stats = IndexStats::default();

        let to_process = &blocks[..limit.unwrap_or(blocks.len()).min(blocks.len())];

        for (i, source) in to_process.iter().enumerate() {
            let Some(image_url) = source.image_url.as_deref() else {
                tracing::info!("Block {} has no image, skipping", source.id);
                stats.skipped += 1;
                continue;
            };

            tracing::info!("[{}/{}] Tagging block {}", i + 1, to_process.len(), source.id);

            match self.tag_block(source, image_url).await {
                Ok(Some(block)) => {
                    index.blocks.push(block);
                    stats.indexed += 1;
                }
                Ok(None) => stats.skipped += 1,
                Err(e) => {
                    tracing::warn!("Block {} failed: {}", source.id, e);
                    stats.failed += 1;
                }
            }

            if i + 1 < to_process.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        index.indexed_at = Utc::now();
        stats.duration_ms = start.elapsed().as_millis() as u64;
        (index, stats)
    }

    async fn tag_block(&self, source: &BlockSource, image_url: &str) -> Result<Option<TaggedBlock>> {
        let downloaded = self.images.fetch(image_url).await?;
        let Some(image) = InlineImage::from_download(downloaded) else {
            return Ok(None);
        };

        let extracted = extract_tags(self.model, image).await?;

        Ok(Some(TaggedBlock {
            id: source.id,
            title: source.title.clone(),
            arena_url: source.arena_url(),
            image_url: Some(image_url.to_string()),
            tags: extracted.tags,
            one_liner: extracted.one_liner.unwrap_or_default(),
            indexed_at: Utc::now(),
        }))
    }
}
