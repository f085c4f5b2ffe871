//! Image-vector index (DashVector collection API).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stockroom_core::similarity::SimilarityHit;

use crate::config::DashVectorConfig;
use crate::error::{ensure_success, CloudError};

const SERVICE: &str = "vector-index";

/// A document stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorDoc {
    pub id: String,
    pub vector: Vec<f32>,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// False for the stand-in used when credentials are missing.
    fn is_configured(&self) -> bool {
        true
    }

    /// Insert or replace a document by id.
    async fn upsert(&self, doc: VectorDoc) -> Result<(), CloudError>;

    /// Nearest neighbours of `vector`, in index order. `filter` is a
    /// DashVector filter expression such as `owner_id = 7`.
    async fn search(
        &self,
        vector: &[f32],
        top_k: u32,
        filter: Option<&str>,
    ) -> Result<Vec<SimilarityHit>, CloudError>;
}

/// [`VectorIndex`] backed by a DashVector collection.
pub struct DashVectorClient {
    client: reqwest::Client,
    config: DashVectorConfig,
}

/// Response envelope shared by all DashVector endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    request_id: Option<String>,
    output: Option<T>,
}

impl<T> Envelope<T> {
    fn into_output(self) -> Result<Option<T>, CloudError> {
        if self.code != 0 {
            tracing::warn!(code = self.code, request_id = ?self.request_id, "DashVector request failed");
            return Err(CloudError::Service {
                service: SERVICE,
                code: self.code,
                message: self.message,
            });
        }
        Ok(self.output)
    }
}

impl DashVectorClient {
    pub fn new(client: reqwest::Client, config: DashVectorConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.endpoint.trim_end_matches('/'))
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Envelope<T>, CloudError> {
        let response = self
            .client
            .post(self.url(path))
            .header("dashvector-auth-token", &self.config.api_key)
            .json(body)
            .send()
            .await?;
        let response = ensure_success(SERVICE, response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| CloudError::Decode {
            service: SERVICE,
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl VectorIndex for DashVectorClient {
    async fn upsert(&self, doc: VectorDoc) -> Result<(), CloudError> {
        let id = doc.id.clone();
        let body = serde_json::json!({ "docs": [doc] });
        self.post::<serde_json::Value>("docs/upsert", &body)
            .await?
            .into_output()?;
        tracing::debug!(id, "Upserted vector");
        Ok(())
    }

    async fn search(
        &self,
        vector: &[f32],
        top_k: u32,
        filter: Option<&str>,
    ) -> Result<Vec<SimilarityHit>, CloudError> {
        let mut body = serde_json::json!({
            "vector": vector,
            "topk": top_k,
            "include_vector": false,
        });
        if let Some(filter) = filter {
            body["filter"] = serde_json::Value::String(filter.to_string());
        }
        let hits = self
            .post::<Vec<SimilarityHit>>("query", &body)
            .await?
            .into_output()?;
        Ok(hits.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn envelope_success_yields_hits() {
        let body = r#"{"code":0,"message":"Success","request_id":"r1",
            "output":[{"id":"item_1","score":42.0,"fields":{"name":"Milk"}}]}"#;
        let env: Envelope<Vec<SimilarityHit>> = serde_json::from_str(body).unwrap();
        let hits = env.into_output().unwrap().unwrap();
        assert_eq!(hits[0].id, "item_1");
        assert_eq!(hits[0].fields["name"], "Milk");
    }

    #[test]
    fn envelope_error_code_is_service_error() {
        let body = r#"{"code":-2976,"message":"Invalid auth token","request_id":"r2"}"#;
        let env: Envelope<Vec<SimilarityHit>> = serde_json::from_str(body).unwrap();
        assert_matches!(
            env.into_output(),
            Err(CloudError::Service { code: -2976, .. })
        );
    }

    #[test]
    fn envelope_without_output_is_empty() {
        let env: Envelope<Vec<SimilarityHit>> =
            serde_json::from_str(r#"{"code":0,"message":""}"#).unwrap();
        assert!(env.into_output().unwrap().is_none());
    }
}
