//! Decodes a generation response into a model-role message.

use crate::chat::models::{Attachment, Message};

use super::generation::GenerationResponse;

/// Name given to media the model generated, since the wire carries none.
pub const GENERATED_MEDIA_NAME: &str = "Generated Image";

/// Acknowledgment substituted when the model returns neither text nor media,
/// so a turn is never silently empty.
pub const EMPTY_REPLY_FALLBACK: &str =
    "මම එම ගොනු පරීක්ෂා කළා. මට ඔබට උදව් කළ හැකි වෙනත් යමක් තිබේද?";

/// Apology shown when the remote call fails; the conversation stays usable
/// for a manual retry.
pub const FAILURE_APOLOGY: &str =
    "සමාවෙන්න, ගොනුව පරීක්ෂා කිරීමේදී දෝෂයක් සිදු වුණා. කරුණාකර නැවත උත්සාහ කරන්න.";

/// Turn a decoded response into the model's message: primary text plus one
/// attachment per inline-media part, falling back to a fixed acknowledgment
/// when both are absent.
pub fn interpret(response: GenerationResponse) -> Message {
    let mut message = Message::model(response.text.unwrap_or_default());

    for part in response.inline_parts {
        message.attachments.push(Attachment {
            name: GENERATED_MEDIA_NAME.to_string(),
            preview: Some(format!("data:{};base64,{}", part.mime_type, part.data)),
            mime_type: part.mime_type,
            data: part.data,
        });
    }

    if message.is_empty() {
        message.text = EMPTY_REPLY_FALLBACK.to_string();
    }

    message
}

/// The fixed model-role message substituted for any generation failure.
pub fn failure_message() -> Message {
    Message::model(FAILURE_APOLOGY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::models::Role;
    use crate::chat::services::generation::InlineData;

    #[test]
    fn test_interpret_text_only() {
        let message = interpret(GenerationResponse {
            text: Some("hello".into()),
            inline_parts: vec![],
        });
        assert_eq!(message.role, Role::Model);
        assert_eq!(message.text, "hello");
        assert!(message.attachments.is_empty());
    }

    #[test]
    fn test_interpret_builds_generated_attachment() {
        let message = interpret(GenerationResponse {
            text: None,
            inline_parts: vec![InlineData {
                mime_type: "image/png".into(),
                data: "AQID".into(),
            }],
        });

        assert_eq!(message.attachments.len(), 1);
        let attachment = &message.attachments[0];
        assert_eq!(attachment.name, GENERATED_MEDIA_NAME);
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(attachment.data, "AQID");
        assert_eq!(
            attachment.preview.as_deref(),
            Some("data:image/png;base64,AQID")
        );
        // Media without text is a valid reply; no fallback text is injected.
        assert!(message.text.is_empty());
    }

    #[test]
    fn test_interpret_empty_response_uses_fallback() {
        let message = interpret(GenerationResponse::default());
        assert_eq!(message.text, EMPTY_REPLY_FALLBACK);
        assert!(!message.is_empty());
    }

    #[test]
    fn test_failure_message_is_the_fixed_apology() {
        let message = failure_message();
        assert_eq!(message.role, Role::Model);
        assert_eq!(message.text, FAILURE_APOLOGY);
    }
}
