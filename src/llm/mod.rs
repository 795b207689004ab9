//! Generative model access
//!
//! - `gemini`: REST client for the multimodal `generateContent` endpoint
//! - `image`: data URLs, base64 payloads and image downloads

pub mod gemini;
pub mod image;

use async_trait::async_trait;

use crate::core::error::Result;

pub use gemini::{GeminiClient, GenerationConfig};
pub use image::InlineImage;

/// One request to a generative model: instruction text plus an optional image
#[derive(Debug, Clone)]
pub struct Prompt {
    pub text: String,
    pub image: Option<InlineImage>,
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(text: impl Into<String>, image: InlineImage) -> Self {
        Self {
            text: text.into(),
            image: Some(image),
        }
    }
}

/// Anything that turns a prompt into text
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String>;
}
