//! Photo handling: product uploads, label recognition, similarity search and
//! URL signing.
//!
//! Every step reports to the activity feed under its own source name so the
//! dashboard shows where a photo got stuck.

use axum::extract::{Multipart, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use stockroom_cloud::{
    CloudError, ExpirationRecognition, ProductRecognition, Recognized, VectorDoc,
};
use stockroom_core::activity::{ActivityEntry, ActivityLevel};
use stockroom_core::expiration::expiration_from_production;
use stockroom_core::images::{validate_object_key, PRODUCT_IMAGE_PREFIX, SCRATCH_IMAGE_PREFIX};
use stockroom_core::similarity::{best_match, clamp_top_k, rank, SimilarityHit};
use stockroom_core::tenant::Tenant;
use stockroom_core::types::Timestamp;
use stockroom_db::models::product::Product;
use stockroom_db::repositories::ProductRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::upload::{store_image, StoredImage, UploadForm, SIGNED_URL_TTL};

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub image: StoredImage,
    pub recognition: ProductRecognition,
    /// Whether the photo was added to the similarity index.
    pub indexed: bool,
}

#[derive(Debug, Serialize)]
pub struct ExpirationResponse {
    pub image: StoredImage,
    pub recognition: ExpirationRecognition,
}

#[derive(Debug, Serialize)]
pub struct ProductionDateResponse {
    pub image: StoredImage,
    pub production_date: Option<String>,
    pub shelf_life_days: Option<i64>,
    /// Production date plus shelf life, when both are known.
    pub expiration_date: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct ImageSearchResponse {
    pub hits: Vec<SimilarityHit>,
    pub best_match: Option<SimilarityHit>,
    pub product: Option<Product>,
}

#[derive(Debug, Deserialize)]
pub struct SignParams {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct SignedImage {
    pub key: String,
    pub url: String,
    pub expires_in: u64,
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

/// POST /api/v1/uploads
///
/// Store a product photo, recognize the product in it and add the photo to
/// the similarity index. Indexing failures are reported in the activity feed
/// and as `indexed: false`; they do not fail the upload.
pub async fn upload_product_image(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant();
    let form = UploadForm::read(multipart).await?;
    let image = store_image(&state, PRODUCT_IMAGE_PREFIX, form).await?;
    report(
        &state,
        &tenant,
        "upload",
        ActivityLevel::Success,
        "Image stored",
        json!({ "key": image.key }),
    );

    let recognition = state
        .cloud
        .vision
        .recognize_product(&image.signed_url)
        .await
        .and_then(Recognized::ensure_ok);
    let recognition = reported(&state, &tenant, "recognition", "Product recognized", recognition)?;

    let indexed = match index_image(&state, &tenant, &image, &recognition).await {
        Ok(()) => {
            report(
                &state,
                &tenant,
                "embedding",
                ActivityLevel::Success,
                "Image indexed",
                json!({ "key": image.key }),
            );
            true
        }
        Err(err) => {
            report(
                &state,
                &tenant,
                "embedding",
                ActivityLevel::Error,
                "Image indexing failed",
                json!({ "key": image.key, "error": err.to_string() }),
            );
            false
        }
    };

    tracing::info!(user_id = auth.user_id, key = %image.key, indexed, "Product image uploaded");

    Ok(Json(DataResponse {
        data: UploadResponse {
            image,
            recognition,
            indexed,
        },
    }))
}

async fn index_image(
    state: &AppState,
    tenant: &Tenant,
    image: &StoredImage,
    recognition: &ProductRecognition,
) -> Result<(), CloudError> {
    let vector = state.cloud.embedding.embed_image(&image.signed_url).await?;

    let mut fields = serde_json::Map::new();
    fields.insert(
        "name".into(),
        json!(recognition.product_name.as_deref().unwrap_or_default()),
    );
    fields.insert("image_url".into(), json!(image.url));
    fields.insert("image_key".into(), json!(image.key));
    fields.insert("owner_id".into(), json!(tenant.user_id()));

    state
        .cloud
        .vector_index
        .upsert(VectorDoc {
            id: uuid::Uuid::now_v7().simple().to_string(),
            vector,
            fields,
        })
        .await
}

// ---------------------------------------------------------------------------
// Label recognition
// ---------------------------------------------------------------------------

/// POST /api/v1/recognition/expiration
///
/// Read the shelf life printed on a label.
pub async fn recognize_expiration(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant();
    let form = UploadForm::read(multipart).await?;
    let image = store_image(&state, SCRATCH_IMAGE_PREFIX, form).await?;

    let recognition = state
        .cloud
        .vision
        .recognize_expiration(&image.signed_url)
        .await
        .and_then(Recognized::ensure_ok);
    let recognition = reported(&state, &tenant, "expiration", "Shelf life recognized", recognition)?;

    Ok(Json(DataResponse {
        data: ExpirationResponse { image, recognition },
    }))
}

/// POST /api/v1/recognition/production-date
///
/// Read the production date printed on a label. With a `shelf_life_days`
/// form field the expiration date is computed too.
pub async fn recognize_production_date(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant();
    let form = UploadForm::read(multipart).await?;
    let shelf_life_days: Option<i64> = form.parsed("shelf_life_days")?;
    let image = store_image(&state, SCRATCH_IMAGE_PREFIX, form).await?;

    let recognition = state
        .cloud
        .vision
        .recognize_production_date(&image.signed_url)
        .await
        .and_then(Recognized::ensure_ok);
    let recognition = reported(
        &state,
        &tenant,
        "production_date",
        "Production date recognized",
        recognition,
    )?;

    let produced = recognition
        .production_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());
    let expiration_date = match (produced, shelf_life_days) {
        (Some(produced), Some(days)) => Some(expiration_from_production(produced, days)?),
        _ => None,
    };

    Ok(Json(DataResponse {
        data: ProductionDateResponse {
            image,
            production_date: recognition.production_date,
            shelf_life_days,
            expiration_date,
        },
    }))
}

// ---------------------------------------------------------------------------
// Similarity search
// ---------------------------------------------------------------------------

/// POST /api/v1/search/image
///
/// Find the caller's products that look like the uploaded photo. Hits are
/// ranked most similar first; `best_match` is set only within the
/// acceptance threshold.
pub async fn search_by_image(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let tenant = auth.tenant();
    let form = UploadForm::read(multipart).await?;
    let top_k = clamp_top_k(form.parsed("top_k")?);
    let image = store_image(&state, SCRATCH_IMAGE_PREFIX, form).await?;

    let search = embed_and_search(&state, &tenant, &image, top_k).await;
    let hits = rank(reported(&state, &tenant, "search", "Image search finished", search)?);

    let best = best_match(&hits).cloned();
    let product = match best
        .as_ref()
        .and_then(|hit| hit.fields.get("image_url"))
        .and_then(|url| url.as_str())
    {
        Some(url) => ProductRepo::find_by_image_url(&state.pool, &tenant, url).await?,
        None => None,
    };

    tracing::info!(
        user_id = auth.user_id,
        top_k,
        hits = hits.len(),
        matched = best.is_some(),
        "Image search"
    );

    Ok(Json(DataResponse {
        data: ImageSearchResponse {
            hits,
            best_match: best,
            product,
        },
    }))
}

async fn embed_and_search(
    state: &AppState,
    tenant: &Tenant,
    image: &StoredImage,
    top_k: u32,
) -> Result<Vec<SimilarityHit>, CloudError> {
    let vector = state.cloud.embedding.embed_image(&image.signed_url).await?;
    let filter = format!("owner_id = {}", tenant.user_id());
    state
        .cloud
        .vector_index
        .search(&vector, top_k, Some(filter.as_str()))
        .await
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// GET /api/v1/images/sign?key=
pub async fn sign_image(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SignParams>,
) -> AppResult<impl IntoResponse> {
    let key = validate_object_key(&params.key)?;
    let url = state.cloud.object_store.signed_url(key, SIGNED_URL_TTL).await?;

    Ok(Json(DataResponse {
        data: SignedImage {
            key: key.to_string(),
            url,
            expires_in: SIGNED_URL_TTL.as_secs(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Activity helpers
// ---------------------------------------------------------------------------

fn report(
    state: &AppState,
    tenant: &Tenant,
    source: &str,
    level: ActivityLevel,
    message: &str,
    details: serde_json::Value,
) {
    state.record_activity(
        ActivityEntry::new(source, level, message)
            .with_details(details)
            .for_tenant(tenant),
    );
}

/// Record the outcome of a cloud call and pass it through.
fn reported<T>(
    state: &AppState,
    tenant: &Tenant,
    source: &str,
    success: &str,
    result: Result<T, CloudError>,
) -> AppResult<T> {
    match result {
        Ok(value) => {
            report(state, tenant, source, ActivityLevel::Success, success, json!({}));
            Ok(value)
        }
        Err(err) => {
            report(
                state,
                tenant,
                source,
                ActivityLevel::Error,
                &format!("{} failed", err.service()),
                json!({ "error": err.to_string() }),
            );
            Err(err.into())
        }
    }
}
