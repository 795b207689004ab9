//! Implementation guides: Markdown write-ups a builder can paste into a
//! system prompt

use chrono::Utc;
use clap::ValueEnum;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::error::Result;

lazy_static! {
    static ref NON_SLUG_RE: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static ref GUIDE_ID_RE: Regex = Regex::new(r"^(\d+)-").unwrap();
}

const SLUG_MAX: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PromptType {
    /// Visual UI references
    #[value(name = "ui-ux")]
    UiUx,
    /// Frameworks, mental models and thinking tools
    Framework,
}

impl PromptType {
    /// Guess from the channel slug; visual content is the default.
    pub fn detect(channel_slug: &str) -> Self {
        let slug = channel_slug.to_lowercase();
        if ["ui", "ux", "design"].iter().any(|k| slug.contains(k)) {
            PromptType::UiUx
        } else if ["framework", "strategy", "thinking"].iter().any(|k| slug.contains(k)) {
            PromptType::Framework
        } else {
            PromptType::UiUx
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptType::UiUx => "ui-ux",
            PromptType::Framework => "framework",
        }
    }

    pub fn prompt_file(&self) -> String {
        format!("implementation-{}.md", self.as_str())
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let slug = NON_SLUG_RE.replace_all(&lowered, "-");
    slug.trim_matches('-').chars().take(SLUG_MAX).collect()
}

/// Block details written into a guide header
pub struct GuideSource<'a> {
    pub id: i64,
    pub title: Option<&'a str>,
    pub arena_url: &'a str,
}

/// Guides of one channel: `<dir>/<id>-<slug>.md`
pub struct GuideStore {
    dir: PathBuf,
}

impl GuideStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(id: i64, title: Option<&str>) -> String {
        let slug = title
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "untitled".to_string());
        format!("{}-{}.md", id, slug)
    }

    pub fn save(&self, source: &GuideSource<'_>, guide: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(source.id, source.title));
        let content = format!(
            "# Implementation Guide\n\n> **Source:** {}\n> **Title:** {}\n> **Generated:** {}\n\n---\n\n{}\n",
            source.arena_url,
            source.title.unwrap_or("(untitled)"),
            Utc::now().to_rfc3339(),
            guide.trim()
        );
        fs::write(&path, content)?;
        Ok(path)
    }

    fn entries(&self) -> impl Iterator<Item = (i64, PathBuf)> {
        WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                let id = GUIDE_ID_RE.captures(&name)?.get(1)?.as_str().parse().ok()?;
                Some((id, e.into_path()))
            })
    }

    /// Block ids that already have a guide.
    pub fn existing_ids(&self) -> BTreeSet<i64> {
        self.entries().map(|(id, _)| id).collect()
    }

    pub fn find(&self, id: i64) -> Option<PathBuf> {
        self.entries().find(|(i, _)| *i == id).map(|(_, p)| p)
    }

    /// The guide body without its header, if one exists for `id`.
    pub fn read_body(&self, id: i64) -> Option<String> {
        let content = fs::read_to_string(self.find(id)?).ok()?;
        let body = match content.split_once("\n---\n") {
            Some((_, body)) => body,
            None => content.as_str(),
        };
        Some(body.trim().to_string())
    }
}
