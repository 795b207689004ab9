//! Images going into and coming out of model calls

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use std::path::Path;

use crate::core::error::{Error, Result};

lazy_static::lazy_static! {
    static ref DATA_URL_RE: Regex = Regex::new(r"(?s)^data:(.+?);base64,(.+)$").unwrap();
}

/// Base64 image payload as the model API expects it
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parse `data:<mime>;base64,<data>`.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let caps = DATA_URL_RE
            .captures(url.trim())
            .ok_or_else(|| Error::InvalidImage("Invalid image format".to_string()))?;
        Ok(Self {
            mime_type: caps[1].to_string(),
            data: caps[2].to_string(),
        })
    }

    /// Read an image file, guessing the mime type from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes, mime_from_path(path)))
    }

    /// Usable as model input; GIFs are not.
    pub fn from_download(image: DownloadedImage) -> Option<Self> {
        if image.mime_type.contains("gif") {
            tracing::warn!("Skipping GIF (unsupported)");
            return None;
        }
        Some(Self::from_bytes(&image.bytes, image.mime_type))
    }
}

pub fn mime_from_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// Raw bytes of a fetched image
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Fetches images by URL
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<DownloadedImage>;
}

pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<DownloadedImage> {
        let resp = self.client.get(url).send().await?.error_for_status()?;

        let mime_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());

        let bytes = resp.bytes().await?.to_vec();
        Ok(DownloadedImage { bytes, mime_type })
    }
}
