//! Upload validation, applied before any network activity.
//!
//! Rules, checked in order:
//! 1. MIME type must be `image/jpeg`, `image/jpg` or `image/png`
//! 2. Size must not exceed [`MAX_IMAGE_BYTES`](crate::defaults::MAX_IMAGE_BYTES)

use crate::defaults::{ALLOWED_MIME_TYPES, MAX_IMAGE_BYTES};
use crate::error::FileValidationError;
use crate::models::ImageFile;
use tracing::debug;

/// Validate a declared MIME type and byte size.
pub fn validate_image(mime_type: &str, size: u64) -> Result<(), FileValidationError> {
    if !is_allowed_mime_type(mime_type) {
        debug!(mime_type, "Rejected upload: unsupported format");
        return Err(FileValidationError::UnsupportedFormat {
            mime_type: mime_type.to_string(),
        });
    }

    if size > MAX_IMAGE_BYTES {
        debug!(file_size = size, "Rejected upload: too large");
        return Err(FileValidationError::TooLarge {
            size,
            max: MAX_IMAGE_BYTES,
        });
    }

    Ok(())
}

/// Validate an image file using its declared MIME type.
pub fn validate_image_file(file: &ImageFile) -> Result<(), FileValidationError> {
    validate_image(&file.mime_type, file.size())
}

pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

/// Detect a MIME type from magic bytes, falling back to the extension.
pub fn detect_mime_type(filename: &str, data: &[u8]) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
    .to_string()
}
