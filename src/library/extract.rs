//! Batch extraction of components and implementation guides
//!
//! Both passes walk the tagged blocks of the channel index, send each
//! block's image to the model with a prompt file, and write one artifact
//! per block. A block that fails is counted and skipped.

use std::time::Duration;

use super::component::{parse_extraction, SourceInfo};
use super::guide::{GuideSource, GuideStore};
use super::store::ComponentStore;
use crate::core::error::{Error, Result};
use crate::llm::image::ImageSource;
use crate::llm::{GenerativeModel, InlineImage, Prompt};
use crate::tags::TaggedBlock;

/// The component model is slower and rate-limited harder
pub const COMPONENT_DELAY: Duration = Duration::from_millis(2000);
pub const GUIDE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Re-extract blocks that already have an artifact
    pub force: bool,
    pub limit: Option<usize>,
    /// Extract just this block, whether or not it was done before
    pub block: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub success: usize,
    pub failed: usize,
    /// Blocks skipped because they were already extracted
    pub existing: usize,
    /// Artifacts on disk after the run
    pub total: usize,
}

/// Pick the blocks a run should process.
pub fn select_blocks<'a>(
    blocks: &'a [TaggedBlock],
    is_done: impl Fn(i64) -> bool,
    options: &ExtractOptions,
) -> Result<(Vec<&'a TaggedBlock>, usize)> {
    if let Some(id) = options.block {
        let block = blocks.iter().find(|b| b.id == id).ok_or_else(|| Error::NotFound {
            kind: "block",
            name: id.to_string(),
        })?;
        if block.image_url.is_none() {
            return Err(Error::BadRequest(format!("Block {} has no image", id)));
        }
        return Ok((vec![block], 0));
    }

    let visual: Vec<&TaggedBlock> = blocks.iter().filter(|b| b.image_url.is_some()).collect();
    let mut existing = 0;
    let mut selected: Vec<&TaggedBlock> = visual
        .into_iter()
        .filter(|b| {
            let done = !options.force && is_done(b.id);
            existing += usize::from(done);
            !done
        })
        .collect();

    if let Some(limit) = options.limit {
        selected.truncate(limit);
    }
    Ok((selected, existing))
}

/// Download a block image and run one prompt against it.
async fn generate_for_block(
    model: &dyn GenerativeModel,
    images: &dyn ImageSource,
    prompt: &str,
    block: &TaggedBlock,
) -> Result<String> {
    let url = block
        .image_url
        .as_deref()
        .ok_or_else(|| Error::BadRequest(format!("Block {} has no image", block.id)))?;
    let image = InlineImage::from_download(images.fetch(url).await?)
        .ok_or_else(|| Error::InvalidImage(format!("Unsupported image for block {}", block.id)))?;
    model.generate(&Prompt::with_image(prompt, image)).await
}

pub struct ComponentExtractor<'a> {
    model: &'a dyn GenerativeModel,
    images: &'a dyn ImageSource,
    store: &'a ComponentStore,
    prompt: String,
    delay: Duration,
}

impl<'a> ComponentExtractor<'a> {
    pub fn new(
        model: &'a dyn GenerativeModel,
        images: &'a dyn ImageSource,
        store: &'a ComponentStore,
        prompt: String,
    ) -> Self {
        Self {
            model,
            images,
            store,
            prompt,
            delay: COMPONENT_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn run(&self, blocks: &[TaggedBlock], options: &ExtractOptions) -> Result<RunStats> {
        let done = self.store.existing_ids();
        let (selected, existing) =
            select_blocks(blocks, |id| done.contains(&id.to_string()), options)?;
        let mut stats = RunStats {
            existing,
            ..RunStats::default()
        };

        for (i, block) in selected.iter().enumerate() {
            tracing::info!(
                "[{}/{}] Extracting component from {}",
                i + 1,
                selected.len(),
                block.display_title()
            );

            match self.extract_one(block).await {
                Ok(name) => {
                    tracing::info!("Saved component {} ({})", block.id, name);
                    stats.success += 1;
                }
                Err(e) => {
                    tracing::warn!("Block {} failed: {}", block.id, e);
                    stats.failed += 1;
                }
            }

            if i + 1 < selected.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        stats.total = self.store.rebuild_index()?.total_components;
        Ok(stats)
    }

    async fn extract_one(&self, block: &TaggedBlock) -> Result<String> {
        let source = SourceInfo::from_block(block)
            .ok_or_else(|| Error::BadRequest(format!("Block {} has no image", block.id)))?;
        let response = generate_for_block(self.model, self.images, &self.prompt, block).await?;
        let component = parse_extraction(&response, source)?;
        self.store.save(&component)?;
        Ok(component.name)
    }
}

pub struct GuideExtractor<'a> {
    model: &'a dyn GenerativeModel,
    images: &'a dyn ImageSource,
    store: &'a GuideStore,
    prompt: String,
    delay: Duration,
}

impl<'a> GuideExtractor<'a> {
    pub fn new(
        model: &'a dyn GenerativeModel,
        images: &'a dyn ImageSource,
        store: &'a GuideStore,
        prompt: String,
    ) -> Self {
        Self {
            model,
            images,
            store,
            prompt,
            delay: GUIDE_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn run(&self, blocks: &[TaggedBlock], options: &ExtractOptions) -> Result<RunStats> {
        let done = self.store.existing_ids();
        let (selected, existing) = select_blocks(blocks, |id| done.contains(&id), options)?;
        let mut stats = RunStats {
            existing,
            ..RunStats::default()
        };

        for (i, block) in selected.iter().enumerate() {
            tracing::info!(
                "[{}/{}] Writing guide for {}",
                i + 1,
                selected.len(),
                block.display_title()
            );

            match self.extract_one(block).await {
                Ok(()) => stats.success += 1,
                Err(e) => {
                    tracing::warn!("Block {} failed: {}", block.id, e);
                    stats.failed += 1;
                }
            }

            if i + 1 < selected.len() && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        stats.total = self.store.existing_ids().len();
        Ok(stats)
    }

    async fn extract_one(&self, block: &TaggedBlock) -> Result<()> {
        let guide = generate_for_block(self.model, self.images, &self.prompt, block).await?;
        if guide.trim().is_empty() {
            return Err(Error::MalformedResponse("empty guide".into()));
        }
        let source = GuideSource {
            id: block.id,
            title: block.title.as_deref(),
            arena_url: &block.arena_url,
        };
        let path = self.store.save(&source, &guide)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}
