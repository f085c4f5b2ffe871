//! Multimodal image embeddings.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ArkConfig;
use crate::error::{ensure_success, CloudError};

const SERVICE: &str = "embedding";

#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// False for the stand-in used when credentials are missing.
    fn is_configured(&self) -> bool {
        true
    }

    async fn embed_image(&self, image_url: &str) -> Result<Vec<f32>, CloudError>;
}

/// [`EmbeddingService`] backed by the Ark `/embeddings/multimodal` endpoint.
pub struct ArkEmbeddingClient {
    client: reqwest::Client,
    config: ArkConfig,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: EmbeddingData,
}

/// The endpoint answers with a single object; older versions used a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingData {
    One { embedding: Vec<f32> },
    Many(Vec<EmbeddingItem>),
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

impl ArkEmbeddingClient {
    pub fn new(client: reqwest::Client, config: ArkConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl EmbeddingService for ArkEmbeddingClient {
    async fn embed_image(&self, image_url: &str) -> Result<Vec<f32>, CloudError> {
        let body = serde_json::json!({
            "model": self.config.embedding_model,
            "input": [{ "type": "image_url", "image_url": { "url": image_url } }],
        });

        let response = self
            .client
            .post(format!("{}/embeddings/multimodal", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(SERVICE, response).await?;
        let text = response.text().await?;
        parse_embedding(&text)
    }
}

fn parse_embedding(body: &str) -> Result<Vec<f32>, CloudError> {
    let decode = |detail: String| CloudError::Decode {
        service: SERVICE,
        detail,
    };
    let parsed: EmbeddingResponse =
        serde_json::from_str(body).map_err(|e| decode(e.to_string()))?;
    let vector = match parsed.data {
        EmbeddingData::One { embedding } => embedding,
        EmbeddingData::Many(items) => items
            .into_iter()
            .next()
            .map(|i| i.embedding)
            .unwrap_or_default(),
    };
    if vector.is_empty() {
        return Err(decode("empty embedding".into()));
    }
    Ok(vector)
}
