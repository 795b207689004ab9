use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GenerativeModel, Prompt};
use crate::core::config::ModelConfig;
use crate::core::error::{Error, Result};

/// Sampling settings sent with every request of a client
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    /// Low temperature, very long output: screenshot-to-code
    pub fn precise() -> Self {
        Self {
            temperature: Some(0.2),
            max_output_tokens: Some(65536),
        }
    }

    /// Guides are prose, so a warmer setting
    pub fn creative() -> Self {
        Self {
            temperature: Some(0.7),
            max_output_tokens: Some(4096),
        }
    }
}

/// Client for one Gemini model
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, config: &ModelConfig, model: &str) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or(Error::ModelNotConfigured)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            generation: GenerationConfig::default(),
        })
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Shared HTTP client. No request timeout unless configured.
pub fn http_client(config: &ModelConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

// ─── Wire types ──────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "is_default_generation")]
    generation_config: GenerationConfig,
}

fn is_default_generation(g: &GenerationConfig) -> bool {
    g.temperature.is_none() && g.max_output_tokens.is_none()
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn build_request<'a>(prompt: &'a Prompt, generation: GenerationConfig) -> GenerateContentRequest<'a> {
    let mut parts = vec![RequestPart::Text { text: &prompt.text }];
    if let Some(image) = &prompt.image {
        parts.push(RequestPart::Inline {
            inline_data: InlineData {
                mime_type: &image.mime_type,
                data: &image.data,
            },
        });
    }
    GenerateContentRequest {
        contents: vec![Content { role: "user", parts }],
        generation_config: generation,
    }
}

/// Text of the first candidate; a candidate with no text parts is an empty answer.
fn response_text(body: GenerateContentResponse) -> Result<String> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::Model("response had no candidates".to_string()))?;

    Ok(candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default())
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let req = build_request(prompt, self.generation);

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Model(format!(
                "{} returned {status}: {body}",
                self.model()
            )));
        }

        let body: GenerateContentResponse = resp.json().await?;
        response_text(body)
    }
}
