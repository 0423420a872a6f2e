//! Attachment encoding
//!
//! Turns a raw file into a transmittable [`Attachment`]: base64 payload,
//! MIME type inferred from the extension, and a data-URI preview for images.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use thiserror::Error;

use crate::chat::models::Attachment;

pub const MAX_FILE_SIZE: u64 = 5_242_880; // 5MB

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("File has no usable name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// MIME type from the file extension, covering the formats the client
/// accepts (images, PDF, CSV, Excel). Unknown extensions fall back to
/// application/octet-stream.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "csv" => "text/csv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        _ => "application/octet-stream",
    }
}

/// Encode raw bytes into an Attachment. The preview is computed here, once,
/// and only for image MIME types.
pub fn encode_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Attachment {
    let mime_type = mime_type.into();
    let data = BASE64_STANDARD.encode(bytes);
    let preview = mime_type
        .starts_with("image/")
        .then(|| format!("data:{};base64,{}", mime_type, data));

    Attachment {
        name: name.into(),
        mime_type,
        data,
        preview,
    }
}

/// Read and encode a file from disk. Enforces the size cap before reading.
pub async fn encode_file(path: &Path) -> Result<Attachment, AttachmentError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AttachmentError::InvalidName(path.display().to_string()))?;

    let metadata = tokio::fs::metadata(path).await?;
    let size = metadata.len();
    if size > MAX_FILE_SIZE {
        return Err(AttachmentError::FileTooLarge {
            size,
            max: MAX_FILE_SIZE,
        });
    }

    let bytes = tokio::fs::read(path).await?;
    Ok(encode_bytes(name, mime_type_for_path(path), &bytes))
}
