//! Tag index for a curated channel
//!
//! A single JSON document holding every tagged block of one channel.
//! It is written once per indexing pass and replaced wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::tagset::CategoryTags;
use crate::core::error::Result;

/// A previously processed reference image with its tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedBlock {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub arena_url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: CategoryTags,
    #[serde(default)]
    pub one_liner: String,
    pub indexed_at: DateTime<Utc>,
}

impl TaggedBlock {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelIndex {
    pub channel_slug: String,
    #[serde(default)]
    pub channel_title: String,
    pub indexed_at: DateTime<Utc>,
    #[serde(default)]
    pub blocks: Vec<TaggedBlock>,
}

impl ChannelIndex {
    pub fn new(channel_slug: impl Into<String>, channel_title: impl Into<String>) -> Self {
        Self {
            channel_slug: channel_slug.into(),
            channel_title: channel_title.into(),
            indexed_at: Utc::now(),
            blocks: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the whole index (atomic write via temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> Option<&TaggedBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
