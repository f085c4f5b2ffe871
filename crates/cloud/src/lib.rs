//! Clients for the third-party services behind the stockroom API.
//!
//! Each collaborator is reached through a narrow `async_trait` so handlers
//! hold `Arc<dyn Trait>` and tests can substitute fakes:
//!
//! | Trait                | Production client    | Service                          |
//! |----------------------|----------------------|----------------------------------|
//! | [`ObjectStore`]      | [`S3ObjectStore`]    | S3-compatible bucket (OSS)       |
//! | [`VisionService`]    | [`ArkVisionClient`]  | Chat-completions vision model    |
//! | [`EmbeddingService`] | [`ArkEmbeddingClient`] | Multimodal embeddings          |
//! | [`VectorIndex`]      | [`DashVectorClient`] | DashVector collection            |
//! | [`BarcodeDirectory`] | [`AliBarcodeClient`] | Barcode catalog API              |
//! | [`SmsGateway`]       | [`LoggingSmsGateway`]| SMS delivery                     |
//!
//! When a service is not configured the [`Unconfigured`] implementation is
//! used and every call fails with [`CloudError::NotConfigured`].

pub mod barcode;
pub mod config;
pub mod embedding;
pub mod error;
pub mod services;
pub mod sms;
pub mod storage;
pub mod unconfigured;
pub mod vector;
pub mod vision;

pub use barcode::{AliBarcodeClient, BarcodeDirectory, BarcodeRecord};
pub use config::CloudConfig;
pub use embedding::{ArkEmbeddingClient, EmbeddingService};
pub use error::CloudError;
pub use services::{CloudServices, CloudStatus};
pub use sms::{LoggingSmsGateway, SmsGateway};
pub use storage::{ObjectStore, S3ObjectStore, StoredObject};
pub use unconfigured::Unconfigured;
pub use vector::{DashVectorClient, VectorDoc, VectorIndex};
pub use vision::{
    ArkVisionClient, CategoryRecognition, ExpirationRecognition, ProductRecognition,
    ProductionDateRecognition, Recognized, VisionService,
};
