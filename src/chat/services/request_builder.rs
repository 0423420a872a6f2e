//! Builds a generation request from a pending user turn.
//!
//! The first part is always the text part (with a default prompt substituted
//! for attachment-only turns), followed by one inline-data part per
//! attachment. Variant selection is a pure function of the text and the
//! attachment MIME types.

use crate::chat::models::Attachment;

use super::generation::{Content, GenerationRequest, InlineData, Part};

/// Prompt substituted when the user sends attachments without text.
pub const DEFAULT_FILE_PROMPT: &str = "Describe this file.";

const DEFAULT_GENERAL_VARIANT: &str = "gemini-3-flash-preview";
const DEFAULT_IMAGE_EDIT_VARIANT: &str = "gemini-2.5-flash-image";

/// Edit-intent keywords, matched case-insensitively as substrings.
/// "වෙනස්" is the Sinhala equivalent of "change".
const EDIT_KEYWORDS: &[&str] = &["edit", "change", "වෙනස්"];

pub struct RequestBuilder {
    general_variant: String,
    image_edit_variant: String,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            general_variant: DEFAULT_GENERAL_VARIANT.to_string(),
            image_edit_variant: DEFAULT_IMAGE_EDIT_VARIANT.to_string(),
        }
    }

    pub fn with_variants(
        general_variant: impl Into<String>,
        image_edit_variant: impl Into<String>,
    ) -> Self {
        Self {
            general_variant: general_variant.into(),
            image_edit_variant: image_edit_variant.into(),
        }
    }

    /// Pick the model variant for a turn: the image-editing profile when an
    /// image is attached and the text carries edit intent, otherwise the
    /// general text/vision profile.
    pub fn select_variant(&self, text: &str, attachments: &[Attachment]) -> &str {
        let has_image = attachments.iter().any(Attachment::is_image);
        let lowered = text.to_lowercase();
        let wants_edit = EDIT_KEYWORDS.iter().any(|kw| lowered.contains(kw));

        if has_image && wants_edit {
            &self.image_edit_variant
        } else {
            &self.general_variant
        }
    }

    /// Assemble the single-user-turn request payload.
    pub fn build(&self, text: &str, attachments: &[Attachment]) -> GenerationRequest {
        let prompt = if text.trim().is_empty() && !attachments.is_empty() {
            DEFAULT_FILE_PROMPT.to_string()
        } else {
            text.to_string()
        };

        let mut parts = vec![Part::Text { text: prompt }];
        for attachment in attachments {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: attachment.mime_type.clone(),
                    data: attachment.data.clone(),
                },
            });
        }

        GenerationRequest {
            model_variant: self.select_variant(text, attachments).to_string(),
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
