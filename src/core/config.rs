//! refmatch configuration module
//!
//! Config loading priority:
//! 1. Project config: refmatch.json
//! 2. Legacy fallback: .refmatch.json
//! 3. Built-in defaults
//!
//! Environment variables override whatever the file says.

use super::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "refmatch.json";
pub const LEGACY_CONFIG_FILE: &str = ".refmatch.json";
pub const CONFIG_VERSION: u32 = 1;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";
pub const CHANNEL_ENV: &str = "REFMATCH_CHANNEL";
pub const BIND_ADDR_ENV: &str = "REFMATCH_BIND_ADDR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Generative model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_base_url", rename = "baseUrl")]
    pub base_url: String,

    /// Only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Model used for tag extraction and explanations
    #[serde(default = "default_fast_model", rename = "tagModel")]
    pub tag_model: String,

    /// Model used for screenshot-to-code extraction
    #[serde(default = "default_component_model", rename = "componentModel")]
    pub component_model: String,

    /// Model used for implementation guides
    #[serde(default = "default_fast_model", rename = "guideModel")]
    pub guide_model: String,

    /// Per-request timeout; none by default
    #[serde(default, rename = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_fast_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_component_model() -> String {
    "gemini-3-pro-preview".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            tag_model: default_fast_model(),
            component_model: default_component_model(),
            guide_model: default_fast_model(),
            timeout_secs: None,
        }
    }
}

/// Locations of everything read or written, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Channel whose index is matched against
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Production index location
    #[serde(default = "default_index")]
    pub index: String,

    /// Development profiles directory; the index lives at <dir>/<channel>/index.json
    #[serde(default = "default_dev_profiles", rename = "devProfiles")]
    pub dev_profiles: String,

    #[serde(default = "default_components")]
    pub components: String,

    #[serde(default = "default_guides")]
    pub guides: String,

    #[serde(default = "default_prompts")]
    pub prompts: String,
}

fn default_channel() -> String {
    "ui-ux-uqgmlf-rw1i".to_string()
}

fn default_index() -> String {
    "data/index.json".to_string()
}

fn default_dev_profiles() -> String {
    "../taste-profiles".to_string()
}

fn default_components() -> String {
    "components".to_string()
}

fn default_guides() -> String {
    "implementation-guides".to_string()
}

fn default_prompts() -> String {
    "prompts".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            index: default_index(),
            dev_profiles: default_dev_profiles(),
            components: default_components(),
            guides: default_guides(),
            prompts: default_prompts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr", rename = "bindAddr")]
    pub bind_addr: String,

    /// Request body cap; screenshots arrive base64-encoded in the body
    #[serde(default = "default_max_body_bytes", rename = "maxBodyBytes")]
    pub max_body_bytes: usize,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            model: ModelConfig::default(),
            paths: PathsConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the project root, then apply environment overrides.
    pub fn load(root: &Path) -> Self {
        let mut config = Self::load_file(root);
        config.apply_env();
        config
    }

    fn load_file(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        let legacy_path = root.join(LEGACY_CONFIG_FILE);

        if config_path.exists() {
            match Self::load_from_file(&config_path) {
                Ok(config) => {
                    if config.version > CONFIG_VERSION {
                        tracing::warn!(
                            "Config version {} is newer than supported version {}",
                            config.version,
                            CONFIG_VERSION
                        );
                    }
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}. Trying legacy path.", CONFIG_FILE, e);
                }
            }
        }

        if legacy_path.exists() {
            match Self::load_from_file(&legacy_path) {
                Ok(config) => {
                    tracing::info!(
                        "Using legacy config {}. Consider renaming it to {}.",
                        LEGACY_CONFIG_FILE,
                        CONFIG_FILE
                    );
                    return config;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load {}: {}. Using defaults.",
                        LEGACY_CONFIG_FILE,
                        e
                    );
                }
            }
        }

        Self::default()
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup. Split out of `apply_env` so tests
    /// don't have to mutate the process environment.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.model.api_key = Some(key);
        }
        if let Some(url) = lookup(BASE_URL_ENV) {
            self.model.base_url = url;
        }
        if let Some(channel) = lookup(CHANNEL_ENV) {
            self.paths.channel = channel;
        }
        if let Some(addr) = lookup(BIND_ADDR_ENV) {
            self.server.bind_addr = addr;
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(root.join(CONFIG_FILE), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.paths.index, "data/index.json");
        assert_eq!(config.model.tag_model, "gemini-2.0-flash");
        assert!(config.model.api_key.is_none());
        assert!(config.model.timeout_secs.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{"paths": {"channel": "dark-dashboards"}, "server": {"bindAddr": "0.0.0.0:8080"}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.paths.channel, "dark-dashboards");
        assert_eq!(config.paths.components, "components");
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.server.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_parse_body_limit() {
        let json = r#"{"server": {"maxBodyBytes": 1048576}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.max_body_bytes, 1048576);
        assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (API_KEY_ENV, "secret"),
            (CHANNEL_ENV, "landing-pages"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.model.api_key.as_deref(), Some("secret"));
        assert_eq!(config.paths.channel, "landing-pages");
        assert_eq!(config.model.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_api_key_never_serialized() {
        let mut config = Config::default();
        config.model.api_key = Some("secret".into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_load_falls_back_to_legacy() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(LEGACY_CONFIG_FILE),
            r#"{"paths": {"guides": "guides"}}"#,
        )
        .unwrap();

        let config = Config::load_file(dir.path());
        assert_eq!(config.paths.guides, "guides");
    }

    #[test]
    fn test_load_broken_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{not json").unwrap();

        let config = Config::load_file(dir.path());
        assert_eq!(config.paths.channel, "ui-ux-uqgmlf-rw1i");
    }
}
