//! Upload validation and object key naming for product photos.

use image::ImageFormat;

use crate::error::CoreError;

/// Key prefix for product photos in the object store.
pub const PRODUCT_IMAGE_PREFIX: &str = "products";

/// Key prefix for transient photos (expiration labels, search queries).
pub const SCRATCH_IMAGE_PREFIX: &str = "scratch";

/// Accepted upload format, detected from the file's magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Jpeg,
    Png,
    Webp,
}

impl UploadFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// Sniff the image format of an upload, rejecting empty or non-image bodies.
pub fn detect_format(bytes: &[u8]) -> Result<UploadFormat, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Validation("uploaded file is empty".into()));
    }
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => Ok(UploadFormat::Jpeg),
        Ok(ImageFormat::Png) => Ok(UploadFormat::Png),
        Ok(ImageFormat::WebP) => Ok(UploadFormat::Webp),
        _ => Err(CoreError::Validation(
            "unsupported image format; expected JPEG, PNG or WebP".into(),
        )),
    }
}

/// Build a unique object key, e.g. `products/<uuid v7>.jpg`.
pub fn object_key(prefix: &str, format: UploadFormat) -> String {
    format!("{prefix}/{}.{}", uuid::Uuid::now_v7(), format.extension())
}

/// Validate a client-supplied object key before signing it.
pub fn validate_object_key(key: &str) -> Result<&str, CoreError> {
    let key = key.trim();
    let allowed_prefix = [PRODUCT_IMAGE_PREFIX, SCRATCH_IMAGE_PREFIX]
        .iter()
        .any(|p| key.strip_prefix(p).is_some_and(|rest| rest.starts_with('/')));
    if !allowed_prefix || key.contains("..") || key.len() > 256 {
        return Err(CoreError::Validation(format!("invalid object key '{key}'")));
    }
    Ok(key)
}
