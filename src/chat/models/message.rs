use serde::{Deserialize, Serialize};

/// Who authored a message. Serialized with the Gemini role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A file payload attached to a message.
///
/// `data` is the full file content, base64-encoded so it can travel inside a
/// JSON request. `preview` is a self-contained `data:` URI, computed once at
/// encode time and only for image MIME types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// A single turn entry in a session's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn user(text: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            attachments,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    /// A message must carry text or at least one attachment to be worth
    /// appending to a session.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.attachments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
    }

    #[test]
    fn test_message_emptiness() {
        assert!(Message::user("   ", vec![]).is_empty());
        assert!(!Message::user("hi", vec![]).is_empty());

        let attachment = Attachment {
            name: "a.png".into(),
            mime_type: "image/png".into(),
            data: "AAAA".into(),
            preview: None,
        };
        assert!(!Message::user("", vec![attachment]).is_empty());
    }

    #[test]
    fn test_attachment_image_detection() {
        let image = Attachment {
            name: "photo.jpg".into(),
            mime_type: "image/jpeg".into(),
            data: "AAAA".into(),
            preview: None,
        };
        let pdf = Attachment {
            name: "report.pdf".into(),
            mime_type: "application/pdf".into(),
            data: "AAAA".into(),
            preview: None,
        };
        assert!(image.is_image());
        assert!(!pdf.is_image());
    }
}
