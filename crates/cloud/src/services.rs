//! Bundle of cloud collaborators shared through application state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::barcode::{AliBarcodeClient, BarcodeDirectory};
use crate::config::CloudConfig;
use crate::embedding::{ArkEmbeddingClient, EmbeddingService};
use crate::error::CloudError;
use crate::sms::{LoggingSmsGateway, SmsGateway};
use crate::storage::{ObjectStore, S3ObjectStore};
use crate::unconfigured::Unconfigured;
use crate::vector::{DashVectorClient, VectorIndex};
use crate::vision::{ArkVisionClient, VisionService};

/// Timeout for outbound HTTP calls. Vision replies can take a while.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Which collaborators have real clients behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CloudStatus {
    pub object_store: bool,
    pub vision: bool,
    pub embedding: bool,
    pub vector_index: bool,
    pub barcode: bool,
}

#[derive(Clone)]
pub struct CloudServices {
    pub object_store: Arc<dyn ObjectStore>,
    pub vision: Arc<dyn VisionService>,
    pub embedding: Arc<dyn EmbeddingService>,
    pub vector_index: Arc<dyn VectorIndex>,
    pub barcode: Arc<dyn BarcodeDirectory>,
    pub sms: Arc<dyn SmsGateway>,
}

impl CloudServices {
    /// Build production clients for every configured group.
    pub async fn from_config(config: &CloudConfig) -> Result<Self, CloudError> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let mut services = Self::unconfigured();

        if let Some(oss) = &config.object_store {
            services.object_store = Arc::new(S3ObjectStore::connect(oss).await);
            tracing::info!(bucket = %oss.bucket, "Object storage enabled");
        }
        if let Some(ark) = &config.ark {
            services.vision = Arc::new(ArkVisionClient::new(http.clone(), ark.clone()));
            services.embedding = Arc::new(ArkEmbeddingClient::new(http.clone(), ark.clone()));
            tracing::info!(base_url = %ark.base_url, "Vision and embeddings enabled");
        }
        if let Some(dv) = &config.dashvector {
            services.vector_index = Arc::new(DashVectorClient::new(http.clone(), dv.clone()));
            tracing::info!("Vector index enabled");
        }
        if let Some(barcode) = &config.barcode {
            services.barcode = Arc::new(AliBarcodeClient::new(http, barcode.clone()));
            tracing::info!("Barcode directory enabled");
        }

        Ok(services)
    }

    pub fn status(&self) -> CloudStatus {
        CloudStatus {
            object_store: self.object_store.is_configured(),
            vision: self.vision.is_configured(),
            embedding: self.embedding.is_configured(),
            vector_index: self.vector_index.is_configured(),
            barcode: self.barcode.is_configured(),
        }
    }

    /// Every service unconfigured except SMS, which logs.
    pub fn unconfigured() -> Self {
        Self {
            object_store: Arc::new(Unconfigured),
            vision: Arc::new(Unconfigured),
            embedding: Arc::new(Unconfigured),
            vector_index: Arc::new(Unconfigured),
            barcode: Arc::new(Unconfigured),
            sms: Arc::new(LoggingSmsGateway),
        }
    }
}
