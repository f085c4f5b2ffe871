//! Multipart photo uploads: parsing, format checks and storage.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use axum::extract::Multipart;
use serde::Serialize;
use stockroom_core::error::CoreError;
use stockroom_core::images::{detect_format, object_key};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Lifetime of signed image URLs handed to clients and to the vision APIs.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

/// Name of the multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// A parsed multipart form: the image bytes plus any text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    file: Option<Vec<u8>>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == FILE_FIELD {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.file = Some(bytes.to_vec());
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    /// A text field parsed as `T`; blank counts as absent.
    pub fn parsed<T: FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        match self.fields.get(name).map(|v| v.trim()) {
            None | Some("") => Ok(None),
            Some(v) => v.parse().map(Some).map_err(|_| {
                AppError::Core(CoreError::Validation(format!("{name} is not valid: '{v}'")))
            }),
        }
    }
}

/// An image written to object storage.
#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    pub key: String,
    /// Public (unsigned) URL; stored on products.
    pub url: String,
    /// Time-limited URL readable by clients and the vision APIs.
    pub signed_url: String,
}

/// Validate the form's image, store it under `prefix` and sign it.
pub async fn store_image(state: &AppState, prefix: &str, form: UploadForm) -> AppResult<StoredImage> {
    let bytes = form
        .file
        .ok_or_else(|| AppError::Core(CoreError::Validation("file is required".into())))?;
    let format = detect_format(&bytes)?;
    let key = object_key(prefix, format);

    let stored = state
        .cloud
        .object_store
        .put(&key, bytes, format.content_type())
        .await?;
    let signed_url = state
        .cloud
        .object_store
        .signed_url(&stored.key, SIGNED_URL_TTL)
        .await?;

    Ok(StoredImage {
        key: stored.key,
        url: stored.url,
        signed_url,
    })
}
