//! Shared fixtures for HTTP-level integration tests: a test config, the app
//! router wired to in-memory cloud fakes, request helpers and seed data.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use stockroom_api::auth::jwt::JwtConfig;
use stockroom_api::config::ServerConfig;
use stockroom_api::router::build_app_router;
use stockroom_api::state::AppState;
use stockroom_cloud::{
    BarcodeDirectory, BarcodeRecord, CategoryRecognition, CloudError, CloudServices,
    EmbeddingService, ExpirationRecognition, LoggingSmsGateway, ObjectStore, ProductRecognition,
    ProductionDateRecognition, StoredObject, VectorDoc, VectorIndex, VisionService,
};
use stockroom_core::activity::BoundedActivityLog;
use stockroom_core::similarity::SimilarityHit;
use stockroom_core::types::DbId;

/// Barcode known to [`FakeBarcodeDirectory`].
pub const DIRECTORY_BARCODE: &str = "6901234567892";
/// Barcode for which [`FakeBarcodeDirectory`] fails.
pub const FAILING_BARCODE: &str = "6900000000000";

/// Smallest body `image::guess_format` recognises as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

const MULTIPART_BOUNDARY: &str = "stockroom-test-boundary";

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and SMS test mode on, so
/// tests can log in through the normal send-code / verify flow.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        sms_test_mode: true,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            expiry_days: 7,
            cookie_secure: false,
        },
    }
}

/// Build the full application router over `pool` with in-memory cloud fakes.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, fake_cloud())
}

/// Build the full application router with the given cloud services.
pub fn build_test_app_with(pool: PgPool, cloud: CloudServices) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cloud,
        activity: Arc::new(BoundedActivityLog::default()),
    };
    build_app_router(state, &config)
}

pub fn fake_cloud() -> CloudServices {
    CloudServices {
        object_store: Arc::new(MemoryObjectStore),
        vision: Arc::new(FakeVision),
        embedding: Arc::new(FakeEmbedding),
        vector_index: Arc::new(MemoryVectorIndex::default()),
        barcode: Arc::new(FakeBarcodeDirectory),
        sms: Arc::new(LoggingSmsGateway),
    }
}

// ---------------------------------------------------------------------------
// Cloud fakes
// ---------------------------------------------------------------------------

pub struct MemoryObjectStore;

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject, CloudError> {
        Ok(StoredObject {
            key: key.to_string(),
            url: format!("https://bucket.test/{key}"),
        })
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<String, CloudError> {
        Ok(format!("https://bucket.test/{key}?expires={}", ttl.as_secs()))
    }
}

/// Recognises every photo as the same carton of milk.
pub struct FakeVision;

#[async_trait]
impl VisionService for FakeVision {
    async fn recognize_product(&self, _image_url: &str) -> Result<ProductRecognition, CloudError> {
        Ok(ProductRecognition {
            status: 0,
            msg: String::new(),
            product_name: Some("Whole Milk".into()),
            brand: Some("Dairy Co".into()),
            specification: Some("250ml".into()),
        })
    }

    async fn recognize_category(
        &self,
        product_name: &str,
    ) -> Result<CategoryRecognition, CloudError> {
        if product_name.contains("Milk") {
            Ok(CategoryRecognition {
                status: 0,
                msg: String::new(),
                code: Some("10000025".into()),
                name: Some("Fresh Milk".into()),
            })
        } else {
            Ok(CategoryRecognition {
                status: 1,
                msg: "no matching category".into(),
                code: None,
                name: None,
            })
        }
    }

    async fn recognize_expiration(
        &self,
        _image_url: &str,
    ) -> Result<ExpirationRecognition, CloudError> {
        Ok(ExpirationRecognition {
            status: 0,
            msg: String::new(),
            shelf_life_days: Some(180),
        })
    }

    async fn recognize_production_date(
        &self,
        _image_url: &str,
    ) -> Result<ProductionDateRecognition, CloudError> {
        Ok(ProductionDateRecognition {
            status: 0,
            msg: String::new(),
            production_date: Some("2025-01-15".into()),
        })
    }
}

pub struct FakeEmbedding;

#[async_trait]
impl EmbeddingService for FakeEmbedding {
    async fn embed_image(&self, _image_url: &str) -> Result<Vec<f32>, CloudError> {
        Ok(vec![0.5, 0.5, 0.0])
    }
}

/// Brute-force index scoring by squared distance, honouring `owner_id = N`
/// filters.
#[derive(Default)]
pub struct MemoryVectorIndex {
    docs: Mutex<Vec<VectorDoc>>,
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn upsert(&self, doc: VectorDoc) -> Result<(), CloudError> {
        let mut docs = self.docs.lock().unwrap();
        docs.retain(|d| d.id != doc.id);
        docs.push(doc);
        Ok(())
    }

    async fn search(
        &self,
        vector: &[f32],
        top_k: u32,
        filter: Option<&str>,
    ) -> Result<Vec<SimilarityHit>, CloudError> {
        let owner: Option<DbId> = filter
            .and_then(|f| f.strip_prefix("owner_id = "))
            .and_then(|id| id.parse().ok());
        let docs = self.docs.lock().unwrap();
        let hits = docs
            .iter()
            .filter(|d| owner.is_none() || d.fields.get("owner_id").and_then(|v| v.as_i64()) == owner)
            .map(|d| SimilarityHit {
                id: d.id.clone(),
                score: d
                    .vector
                    .iter()
                    .zip(vector)
                    .map(|(a, b)| f64::from((a - b) * (a - b)))
                    .sum(),
                fields: d.fields.clone(),
            })
            .take(top_k as usize)
            .collect();
        Ok(hits)
    }
}

pub struct FakeBarcodeDirectory;

#[async_trait]
impl BarcodeDirectory for FakeBarcodeDirectory {
    async fn lookup(&self, barcode: &str) -> Result<Option<BarcodeRecord>, CloudError> {
        match barcode {
            DIRECTORY_BARCODE => Ok(Some(BarcodeRecord {
                barcode: Some(DIRECTORY_BARCODE.into()),
                goods_name: Some("Whole Milk 250ml".into()),
                brand: Some("Dairy Co".into()),
                category_code: Some("10000025".into()),
                spec: Some("250ml*24".into()),
                price: Some("59.90".into()),
                ..Default::default()
            })),
            FAILING_BARCODE => Err(CloudError::Service {
                service: "barcode",
                code: 500,
                message: "catalog unavailable".into(),
            }),
            _ => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(COOKIE, format!("token={token}")),
        None => builder,
    }
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    request(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

/// GET with the session cookie.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::GET, uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::DELETE, uri, Some(token)).body(Body::empty()).unwrap()).await
}

/// POST a multipart form with text `fields` and an optional `file` part.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    file: Option<&[u8]>,
) -> Response {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = request(Method::POST, uri, Some(token))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Log in through send-code / verify and return the session token.
pub async fn login(app: &Router, phone: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/send-code",
        serde_json::json!({ "phone": phone }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let code = body_json(response).await["data"]["code"]
        .as_str()
        .expect("test mode echoes the code")
        .to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/verify",
        serde_json::json!({ "phone": phone, "code": code }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// Ids of the taxonomy inserted by [`seed_taxonomy`].
pub struct Taxonomy {
    pub segment_id: DbId,
    pub family_id: DbId,
    pub class_id: DbId,
    pub milk_brick_id: DbId,
    pub yogurt_brick_id: DbId,
}

/// Food > Dairy > Milk Products > {Fresh Milk (10000025), Yogurt (10000026)}.
pub async fn seed_taxonomy(pool: &PgPool) -> Taxonomy {
    let segment_id: DbId = sqlx::query_scalar(
        "INSERT INTO segments (code, name) VALUES ('50000000', 'Food') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    let family_id: DbId = sqlx::query_scalar(
        "INSERT INTO families (code, name, segment_id) VALUES ('50200000', 'Dairy', $1) RETURNING id",
    )
    .bind(segment_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let class_id: DbId = sqlx::query_scalar(
        "INSERT INTO classes (code, name, family_id) VALUES ('50201700', 'Milk Products', $1) RETURNING id",
    )
    .bind(family_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let milk_brick_id: DbId = sqlx::query_scalar(
        "INSERT INTO bricks (code, name, definition, class_id)
         VALUES ('10000025', 'Fresh Milk', 'Liquid milk', $1) RETURNING id",
    )
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let yogurt_brick_id: DbId = sqlx::query_scalar(
        "INSERT INTO bricks (code, name, class_id) VALUES ('10000026', 'Yogurt', $1) RETURNING id",
    )
    .bind(class_id)
    .fetch_one(pool)
    .await
    .unwrap();

    Taxonomy {
        segment_id,
        family_id,
        class_id,
        milk_brick_id,
        yogurt_brick_id,
    }
}

/// Create a room and a cabinet through the API; returns `(room_id, cabinet_id)`.
pub async fn create_location(app: &Router, token: &str, room: &str, cabinet: &str) -> (DbId, DbId) {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/rooms",
        token,
        serde_json::json!({ "name": room }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let room_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/cabinets",
        token,
        serde_json::json!({ "name": cabinet, "room_id": room_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cabinet_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    (room_id, cabinet_id)
}

/// Upsert a product through the API; returns its id.
pub async fn create_product(app: &Router, token: &str, barcode: &str, name: &str) -> DbId {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/products",
        token,
        serde_json::json!({ "barcode": barcode, "name": name }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
