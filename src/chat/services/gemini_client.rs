//! GeminiClient - Direct REST implementation of the generation service.
//!
//! Calls the Gemini `generateContent` endpoint with the request built by the
//! request builder and decodes text and inline-media parts from the first
//! candidate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::generation::{
    GenerationError, GenerationRequest, GenerationResponse, GenerationService, InlineData,
};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A stuck request must not leave a turn in flight forever, so every call
/// carries a bounded deadline.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            BASE_URL,
            model = request.model_variant,
            api_key = self.api_key
        );

        debug!(model = %request.model_variant, "Calling Gemini generateContent");

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|err| GenerationError::Request(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(GenerationError::Api {
                status,
                message: extract_error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::MalformedResponse(err.to_string()))?;

        Ok(decode_response(parsed))
    }
}

fn decode_response(response: GenerateContentResponse) -> GenerationResponse {
    let parts = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();

    let mut text = String::new();
    let mut inline_parts = Vec::new();
    for part in parts {
        if let Some(t) = part.text {
            text.push_str(&t);
        }
        if let Some(data) = part.inline_data {
            inline_parts.push(data);
        }
    }

    GenerationResponse {
        text: (!text.is_empty()).then_some(text),
        inline_parts,
    }
}

/// Pull the human-readable message out of Gemini's error envelope, falling
/// back to the raw body when it does not parse.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .unwrap_or_else(|| body.to_string())
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
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
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_and_inline_data() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your image."},
                        {"inlineData": {"mimeType": "image/png", "data": "AQID"}}
                    ]
                }
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let decoded = decode_response(parsed);

        assert_eq!(decoded.text.as_deref(), Some("Here is your image."));
        assert_eq!(decoded.inline_parts.len(), 1);
        assert_eq!(decoded.inline_parts[0].mime_type, "image/png");
    }

    #[test]
    fn test_decode_empty_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        let decoded = decode_response(parsed);
        assert!(decoded.text.is_none());
        assert!(decoded.inline_parts.is_empty());
    }

    #[test]
    fn test_extract_error_message_from_envelope() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(extract_error_message(body), "Quota exceeded");
    }

    #[test]
    fn test_extract_error_message_falls_back_to_body() {
        assert_eq!(extract_error_message("plain failure"), "plain failure");
    }
}
