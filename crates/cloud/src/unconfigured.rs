//! Stand-in for services without credentials.

use std::time::Duration;

use async_trait::async_trait;
use stockroom_core::similarity::SimilarityHit;

use crate::barcode::{BarcodeDirectory, BarcodeRecord};
use crate::embedding::EmbeddingService;
use crate::error::CloudError;
use crate::sms::SmsGateway;
use crate::storage::{ObjectStore, StoredObject};
use crate::vector::{VectorDoc, VectorIndex};
use crate::vision::{
    CategoryRecognition, ExpirationRecognition, ProductRecognition, ProductionDateRecognition,
    VisionService,
};

/// Implements every service trait by failing with [`CloudError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Unconfigured;

#[async_trait]
impl ObjectStore for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn put(&self, _: &str, _: Vec<u8>, _: &str) -> Result<StoredObject, CloudError> {
        Err(CloudError::NotConfigured("object storage"))
    }

    async fn signed_url(&self, _: &str, _: Duration) -> Result<String, CloudError> {
        Err(CloudError::NotConfigured("object storage"))
    }
}

#[async_trait]
impl VisionService for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn recognize_product(&self, _: &str) -> Result<ProductRecognition, CloudError> {
        Err(CloudError::NotConfigured("vision"))
    }

    async fn recognize_category(&self, _: &str) -> Result<CategoryRecognition, CloudError> {
        Err(CloudError::NotConfigured("vision"))
    }

    async fn recognize_expiration(&self, _: &str) -> Result<ExpirationRecognition, CloudError> {
        Err(CloudError::NotConfigured("vision"))
    }

    async fn recognize_production_date(
        &self,
        _: &str,
    ) -> Result<ProductionDateRecognition, CloudError> {
        Err(CloudError::NotConfigured("vision"))
    }
}

#[async_trait]
impl EmbeddingService for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn embed_image(&self, _: &str) -> Result<Vec<f32>, CloudError> {
        Err(CloudError::NotConfigured("embedding"))
    }
}

#[async_trait]
impl VectorIndex for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn upsert(&self, _: VectorDoc) -> Result<(), CloudError> {
        Err(CloudError::NotConfigured("vector-index"))
    }

    async fn search(
        &self,
        _: &[f32],
        _: u32,
        _: Option<&str>,
    ) -> Result<Vec<SimilarityHit>, CloudError> {
        Err(CloudError::NotConfigured("vector-index"))
    }
}

#[async_trait]
impl BarcodeDirectory for Unconfigured {
    fn is_configured(&self) -> bool {
        false
    }

    async fn lookup(&self, _: &str) -> Result<Option<BarcodeRecord>, CloudError> {
        Err(CloudError::NotConfigured("barcode"))
    }
}

#[async_trait]
impl SmsGateway for Unconfigured {
    async fn send_code(&self, _: &str, _: &str) -> Result<(), CloudError> {
        Err(CloudError::NotConfigured("sms"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn reports_itself_unconfigured() {
        assert!(!ObjectStore::is_configured(&Unconfigured));
        assert!(!VisionService::is_configured(&Unconfigured));
        assert!(!BarcodeDirectory::is_configured(&Unconfigured));
    }

    #[tokio::test]
    async fn every_call_reports_not_configured() {
        let svc = Unconfigured;
        assert_matches!(
            svc.put("k", vec![1], "image/png").await,
            Err(CloudError::NotConfigured("object storage"))
        );
        assert_matches!(
            svc.embed_image("u").await,
            Err(CloudError::NotConfigured("embedding"))
        );
        assert_matches!(
            BarcodeDirectory::lookup(&svc, "123").await,
            Err(CloudError::NotConfigured("barcode"))
        );
    }
}
