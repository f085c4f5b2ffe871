//! Barcode catalog lookup (Aliyun market barcode API).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::BarcodeConfig;
use crate::error::{ensure_success, CloudError};

const SERVICE: &str = "barcode";

/// Catalog success code.
const SUCCESS_CODE: i64 = 1;

/// Product attributes as published by the barcode catalog.
///
/// Every field is optional text; the catalog reports price and dimensions
/// as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeRecord {
    pub barcode: Option<String>,
    pub brand: Option<String>,
    pub goods_name: Option<String>,
    pub company: Option<String>,
    pub keyword: Option<String>,
    pub goods_type: Option<String>,
    pub category_code: Option<String>,
    pub category_name: Option<String>,
    pub image: Option<String>,
    pub spec: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub depth: Option<String>,
    pub gross_weight: Option<String>,
    pub net_weight: Option<String>,
    pub price: Option<String>,
    pub origin_country: Option<String>,
    pub first_ship_date: Option<String>,
    pub packaging_type: Option<String>,
    pub shelf_life: Option<String>,
    pub min_sales_unit: Option<String>,
    pub certification_standard: Option<String>,
    pub certificate_license: Option<String>,
    pub remark: Option<String>,
}

impl BarcodeRecord {
    /// The published price as a number, if it parses.
    pub fn price_value(&self) -> Option<f64> {
        self.price
            .as_deref()
            .and_then(|p| p.trim().trim_start_matches('¥').parse().ok())
    }
}

#[async_trait]
pub trait BarcodeDirectory: Send + Sync {
    /// False for the stand-in used when credentials are missing.
    fn is_configured(&self) -> bool {
        true
    }

    /// Look a barcode up; `Ok(None)` when the catalog has no entry.
    async fn lookup(&self, barcode: &str) -> Result<Option<BarcodeRecord>, CloudError>;
}

/// [`BarcodeDirectory`] backed by the Aliyun market barcode API.
pub struct AliBarcodeClient {
    client: reqwest::Client,
    config: BarcodeConfig,
}

#[derive(Debug, Deserialize)]
struct BarcodeResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<BarcodeRecord>,
}

impl AliBarcodeClient {
    pub fn new(client: reqwest::Client, config: BarcodeConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl BarcodeDirectory for AliBarcodeClient {
    async fn lookup(&self, barcode: &str) -> Result<Option<BarcodeRecord>, CloudError> {
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[("barcode", barcode)])
            .header("Authorization", format!("APPCODE {}", self.config.app_code))
            .send()
            .await?;
        let response = ensure_success(SERVICE, response).await?;
        let text = response.text().await?;
        parse_lookup(&text)
    }
}

fn parse_lookup(body: &str) -> Result<Option<BarcodeRecord>, CloudError> {
    let parsed: BarcodeResponse = serde_json::from_str(body).map_err(|e| CloudError::Decode {
        service: SERVICE,
        detail: e.to_string(),
    })?;
    if parsed.code != SUCCESS_CODE {
        return Err(CloudError::Service {
            service: SERVICE,
            code: parsed.code,
            message: parsed.msg,
        });
    }
    Ok(parsed
        .data
        .filter(|r| r.goods_name.as_deref().is_some_and(|n| !n.trim().is_empty())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_catalog_hit() {
        let body = r#"{"code":1,"msg":"ok","data":{"barcode":"6901234567892",
            "goods_name":"Whole Milk 250ml","brand":"Brand A","price":"3.50","spec":"250ml"}}"#;
        let record = parse_lookup(body).unwrap().unwrap();
        assert_eq!(record.goods_name.as_deref(), Some("Whole Milk 250ml"));
        assert_eq!(record.price_value(), Some(3.5));
        assert!(record.company.is_none());
    }

    #[test]
    fn empty_data_is_not_found() {
        assert!(parse_lookup(r#"{"code":1,"msg":"ok","data":null}"#).unwrap().is_none());
        assert!(parse_lookup(r#"{"code":1,"msg":"ok","data":{"goods_name":""}}"#)
            .unwrap()
            .is_none());
    }

    #[test]
    fn failure_code_is_service_error() {
        assert_matches!(
            parse_lookup(r#"{"code":0,"msg":"quota exceeded"}"#),
            Err(CloudError::Service { service: "barcode", code: 0, .. })
        );
    }

    #[test]
    fn unparseable_price_is_none() {
        let record = BarcodeRecord {
            price: Some("n/a".into()),
            ..Default::default()
        };
        assert_eq!(record.price_value(), None);
    }
}
