//! Remote generative-AI collaborator
//!
//! Repair, XML-to-JSON conversion and sample generation are delegated to a
//! text-completion service. The rest of the crate only sees the
//! [`AiCollaborator`] port; [`GeminiClient`] is the production implementation.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AiResult;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Settings for the remote collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    /// Credential; every operation fails fast while this is unset
    pub api_key: Option<String>,
    /// Model name appended to the base URL
    pub model: String,
    /// Endpoint prefix, without the trailing model segment
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Optional sampling temperature
    pub temperature: Option<f32>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 60,
            temperature: None,
        }
    }
}

/// The three delegated operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiOperation {
    Repair,
    ConvertToJson,
    GenerateSample,
}

impl AiOperation {
    /// Language tag expected on a fenced reply
    pub fn fence_language(self) -> &'static str {
        match self {
            AiOperation::Repair | AiOperation::GenerateSample => "xml",
            AiOperation::ConvertToJson => "json",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AiOperation::Repair => "repair",
            AiOperation::ConvertToJson => "convert",
            AiOperation::GenerateSample => "generate",
        }
    }

    /// Prompt sent for this operation; `input` is ignored by sample generation.
    pub fn prompt(self, input: &str) -> String {
        match self {
            AiOperation::Repair => format!(
                "Fix the following malformed XML. Return ONLY the corrected XML string without any markdown formatting or explanation.\n\nBroken XML:\n{}",
                input
            ),
            AiOperation::ConvertToJson => format!(
                "Convert the following XML to valid JSON. Handle attributes and nested structures intelligently. Return ONLY the JSON string without markdown.\n\nXML:\n{}",
                input
            ),
            AiOperation::GenerateSample => "Generate a complex sample XML document representing a library catalog with books, authors, and genres. Include at least 3 items with attributes. Return ONLY the XML.".to_string(),
        }
    }
}

/// Port to the remote text-completion service.
///
/// Replies are returned with any surrounding code fence already removed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiCollaborator: Send + Sync {
    /// Best-effort correction of malformed XML
    async fn repair(&self, broken_xml: &str) -> AiResult<String>;

    /// JSON rendition of an XML document
    async fn convert_to_json(&self, xml: &str) -> AiResult<String>;

    /// An illustrative multi-record XML document
    async fn generate_sample(&self) -> AiResult<String>;
}
