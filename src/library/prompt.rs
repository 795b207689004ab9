//! Prompt files
//!
//! A prompt file is Markdown: free-form notes, a `---` separator, then the
//! prompt itself as the first fenced block.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};

lazy_static! {
    static ref FENCE_RE: Regex = Regex::new(r"```[^\n]*\n([\s\S]*?)```").unwrap();
}

pub const SCREENSHOT_TO_CODE: &str = "screenshot-to-code.md";

/// Extract the prompt text from a prompt file's contents.
pub fn parse_prompt(content: &str) -> Option<String> {
    let (_, after) = content.split_once("---")?;
    let prompt = FENCE_RE.captures(after)?.get(1)?.as_str().trim();
    (!prompt.is_empty()).then(|| prompt.to_string())
}

pub fn prompt_path(prompts_dir: &Path, file_name: &str) -> PathBuf {
    prompts_dir.join(file_name)
}

pub fn load_prompt(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::MissingResource {
            resource: "Prompt file",
            path: path.to_path_buf(),
            remediation: "Create it with the prompt in a fenced block after a `---` line."
                .to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    parse_prompt(&content).ok_or_else(|| Error::MissingResource {
        resource: "Prompt",
        path: path.to_path_buf(),
        remediation: "Put the prompt in a fenced block after the first `---` line.".to_string(),
    })
}
