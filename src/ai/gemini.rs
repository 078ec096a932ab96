//! Google Gemini API Client Implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{AiCollaborator, AiConfig, AiOperation};
use crate::error::{AiError, AiResult};
use crate::fence::strip_code_fence;
use crate::http_client::{AsyncHttpClient, HttpClientConfig};

/// Header carrying the API key; the key never appears in a URL
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client
pub struct GeminiClient {
    config: AiConfig,
    http: AsyncHttpClient,
}

/// Gemini API request format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> AiResult<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AiError::EmptyResponse("No candidates in response".to_string()))?;

        if let Some(reason) = &candidate.finish_reason
            && reason != "STOP"
        {
            warn!("Gemini candidate finished with reason {}", reason);
        }

        let content = candidate
            .content
            .ok_or_else(|| AiError::EmptyResponse("No content in candidate".to_string()))?;

        Ok(content.parts.into_iter().filter_map(|p| p.text).collect())
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// A missing API key is not an error here; it is reported by each
    /// operation before anything is sent.
    pub fn new(config: AiConfig) -> AiResult<Self> {
        let http = AsyncHttpClient::new(HttpClientConfig {
            timeout_seconds: config.timeout_seconds,
            ..Default::default()
        })?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    fn api_key(&self) -> AiResult<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AiError::MissingApiKey)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, prompt: String) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: self
                .config
                .temperature
                .map(|temperature| GeminiGenerationConfig { temperature }),
        }
    }

    /// Run one operation: prompt, send, unwrap the fenced reply.
    async fn run(&self, operation: AiOperation, input: &str) -> AiResult<String> {
        let api_key = self.api_key()?;
        info!("Sending {} request to {}", operation.name(), self.config.model);

        let request = self.build_request(operation.prompt(input));

        let response: GeminiResponse = self
            .http
            .post_json(&self.endpoint(), &[(API_KEY_HEADER, api_key)], &request)
            .await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                "Gemini API usage - Prompt: {:?} tokens, Response: {:?} tokens, Total: {:?} tokens",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        let raw = response.into_text()?;
        Ok(strip_code_fence(&raw, operation.fence_language()))
    }
}

#[async_trait]
impl AiCollaborator for GeminiClient {
    async fn repair(&self, broken_xml: &str) -> AiResult<String> {
        self.run(AiOperation::Repair, broken_xml).await
    }

    async fn convert_to_json(&self, xml: &str) -> AiResult<String> {
        self.run(AiOperation::ConvertToJson, xml).await
    }

    async fn generate_sample(&self) -> AiResult<String> {
        self.run(AiOperation::GenerateSample, "").await
    }
}
