//! Generation service contract and wire types.
//!
//! The request/response shapes follow the Gemini `generateContent` JSON
//! format: an ordered list of parts per content, where a part is either text
//! or inline base64 data tagged with its MIME type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    /// Model variant to invoke, e.g. the general or image-editing profile.
    #[serde(skip)]
    pub model_variant: String,
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String, // base64-encoded
}

/// Decoded model output: the primary text (if any) plus any structured
/// inline-media parts the model returned.
#[derive(Debug, Clone, Default)]
pub struct GenerationResponse {
    pub text: Option<String>,
    pub inline_parts: Vec<InlineData>,
}

/// The remote multimodal generation collaborator. Latency and availability
/// are outside this crate's control; all fallback behavior lives at the
/// controller/interpreter boundary.
#[async_trait]
pub trait GenerationService: Send + Sync + 'static {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;
}
