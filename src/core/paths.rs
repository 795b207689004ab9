//! Project path management
//!
//! Handles project root detection and resolution of every configured path.

use std::path::{Path, PathBuf};

use super::config::Config;
use super::error::{Error, Result};
use crate::tags::index::ChannelIndex;

/// Environment variable for project root configuration
pub const ROOT_ENV: &str = "REFMATCH_ROOT";

/// Project paths wrapper that combines config and resolved paths
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub root: PathBuf,
    /// Production index location
    pub index: PathBuf,
    /// Development index location, used when the production one is absent
    pub dev_index: PathBuf,
    pub components: PathBuf,
    pub guides: PathBuf,
    pub prompts: PathBuf,
    pub config: Config,
}

impl ProjectPaths {
    /// Create ProjectPaths from environment variable or current directory.
    pub fn new() -> Self {
        Self::from_root(get_project_root())
    }

    pub fn from_root(root: PathBuf) -> Self {
        let config = Config::load(&root);
        Self::from_root_with_config(root, config)
    }

    pub fn from_root_with_config(root: PathBuf, config: Config) -> Self {
        let p = &config.paths;
        Self {
            index: root.join(&p.index),
            dev_index: root
                .join(&p.dev_profiles)
                .join(&p.channel)
                .join("index.json"),
            components: root.join(&p.components),
            guides: root.join(&p.guides),
            prompts: root.join(&p.prompts),
            root,
            config,
        }
    }

    /// Same root and config, resolved for another channel.
    pub fn with_channel(self, channel: &str) -> Self {
        let mut config = self.config;
        config.paths.channel = channel.to_string();
        Self::from_root_with_config(self.root, config)
    }

    /// Apply an optional channel override.
    pub fn for_channel(self, channel: Option<&str>) -> Self {
        match channel {
            Some(channel) => self.with_channel(channel),
            None => self,
        }
    }

    pub fn channel(&self) -> &str {
        &self.config.paths.channel
    }

    /// Production index if it exists, otherwise the development one.
    pub fn resolve_index_path(&self) -> &Path {
        if self.index.exists() {
            &self.index
        } else {
            &self.dev_index
        }
    }

    /// Load the channel index, failing with a remediation hint when missing.
    pub fn load_index(&self) -> Result<ChannelIndex> {
        let path = self.resolve_index_path();
        if !path.exists() {
            return Err(Error::IndexNotFound {
                path: self.index.clone(),
                remediation: index_remediation(self.channel()),
            });
        }
        ChannelIndex::load(path)
    }

    pub fn guides_dir(&self, channel: &str) -> PathBuf {
        self.guides.join(channel)
    }
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self::new()
    }
}

/// Command that rebuilds the index for a channel
pub fn index_remediation(channel: &str) -> String {
    format!(
        "refmatch index build --channel={} --blocks=<manifest.json>",
        channel
    )
}

/// Get project root from environment variable or current directory.
/// Priority: REFMATCH_ROOT env var > current directory
pub fn get_project_root() -> PathBuf {
    if let Ok(path) = std::env::var(ROOT_ENV) {
        let root = PathBuf::from(&path);
        if root.exists() {
            return root;
        }
        tracing::warn!(
            "{} is set to '{}' but path does not exist. Falling back to current directory.",
            ROOT_ENV,
            path
        );
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_index(path: &Path, slug: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let json = format!(
            r#"{{"channel_slug": "{}", "channel_title": "t", "indexed_at": "2026-01-01T00:00:00Z", "blocks": []}}"#,
            slug
        );
        fs::write(path, json).unwrap();
    }

    #[test]
    fn test_prefers_production_index() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("web");
        let paths = ProjectPaths::from_root_with_config(root, Config::default());

        write_index(&paths.index, "prod");
        write_index(&paths.dev_index, "dev");

        assert_eq!(paths.load_index().unwrap().channel_slug, "prod");
    }

    #[test]
    fn test_falls_back_to_dev_index() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("web");
        let paths = ProjectPaths::from_root_with_config(root, Config::default());

        write_index(&paths.dev_index, "dev");

        assert_eq!(paths.resolve_index_path(), paths.dev_index.as_path());
        assert_eq!(paths.load_index().unwrap().channel_slug, "dev");
    }

    #[test]
    fn test_channel_override_moves_dev_index() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("web");
        let paths = ProjectPaths::from_root_with_config(root, Config::default());
        let default_dev = paths.dev_index.clone();

        let paths = paths.for_channel(Some("frameworks"));
        write_index(&paths.dev_index, "frameworks");

        assert_eq!(paths.channel(), "frameworks");
        assert_ne!(paths.dev_index, default_dev);
        assert!(paths.dev_index.ends_with("frameworks/index.json"));
        assert_eq!(paths.load_index().unwrap().channel_slug, "frameworks");
        assert_eq!(paths.guides_dir(paths.channel()), paths.guides.join("frameworks"));
    }

    #[test]
    fn test_missing_index_names_rebuild_command() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ProjectPaths::from_root_with_config(dir.path().to_path_buf(), Config::default());

        match paths.load_index() {
            Err(Error::IndexNotFound { remediation, .. }) => {
                assert!(remediation.contains("--channel=ui-ux-uqgmlf-rw1i"));
            }
            other => panic!("expected IndexNotFound, got {:?}", other.map(|_| ())),
        }
    }
}
