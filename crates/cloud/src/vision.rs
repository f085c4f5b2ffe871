//! Product, category and date recognition through a vision chat model.
//!
//! The model is prompted to reply with a small JSON object carrying a
//! `status` (0 = success) and `msg`. Replies are often wrapped in Markdown
//! code fences, which are stripped before parsing.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::ArkConfig;
use crate::error::{ensure_success, CloudError};

const SERVICE: &str = "vision";

const PRODUCT_PROMPT: &str = "Identify the product in this photo. Reply with JSON only: \
    {\"status\": 0, \"productName\": \"...\", \"brand\": \"...\", \"specification\": \"...\", \"msg\": \"\"}. \
    Use a non-zero status and explain in msg if no product is visible.";

const EXPIRATION_PROMPT: &str = "Read the shelf life printed on this package. Reply with JSON only: \
    {\"status\": 0, \"shelfLife\": <days as integer>, \"msg\": \"\"}. \
    Use a non-zero status and explain in msg if no shelf life is visible.";

const PRODUCTION_DATE_PROMPT: &str = "Read the production date printed on this package. Reply with JSON only: \
    {\"status\": 0, \"productionDate\": \"YYYY-MM-DD\", \"msg\": \"\"}. \
    Use a non-zero status and explain in msg if no date is visible.";

const CATEGORY_PROMPT: &str = "Classify this product into a GS1 GPC brick. Reply with JSON only: \
    {\"status\": 0, \"code\": \"<8-digit brick code>\", \"name\": \"<brick name>\", \"msg\": \"\"}. Product: ";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Common shape of every recognition reply.
pub trait Recognized: Sized {
    fn status(&self) -> i64;
    fn msg(&self) -> &str;

    /// Turn a non-zero status into [`CloudError::Recognition`].
    fn ensure_ok(self) -> Result<Self, CloudError> {
        if self.status() == 0 {
            Ok(self)
        } else {
            Err(CloudError::Recognition {
                status: self.status(),
                msg: self.msg().to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecognition {
    pub status: i64,
    #[serde(default, alias = "message")]
    pub msg: String,
    #[serde(default, alias = "productName")]
    pub product_name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default, alias = "spec")]
    pub specification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecognition {
    pub status: i64,
    #[serde(default, alias = "message")]
    pub msg: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, alias = "category")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationRecognition {
    pub status: i64,
    #[serde(default, alias = "message")]
    pub msg: String,
    /// Shelf life in days.
    #[serde(
        default,
        alias = "shelfLife",
        alias = "shelfLifeDays",
        deserialize_with = "lenient_days"
    )]
    pub shelf_life_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionDateRecognition {
    pub status: i64,
    #[serde(default, alias = "message")]
    pub msg: String,
    #[serde(default, alias = "productionDate")]
    pub production_date: Option<String>,
}

macro_rules! impl_recognized {
    ($($ty:ty),*) => {$(
        impl Recognized for $ty {
            fn status(&self) -> i64 {
                self.status
            }
            fn msg(&self) -> &str {
                &self.msg
            }
        }
    )*};
}

impl_recognized!(
    ProductRecognition,
    CategoryRecognition,
    ExpirationRecognition,
    ProductionDateRecognition
);

/// Accept `180`, `"180"` or `null` for a day count.
fn lenient_days<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Days {
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Days>::deserialize(deserializer)? {
        Some(Days::Int(n)) => Some(n),
        Some(Days::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait VisionService: Send + Sync {
    /// False for the stand-in used when credentials are missing.
    fn is_configured(&self) -> bool {
        true
    }

    async fn recognize_product(&self, image_url: &str) -> Result<ProductRecognition, CloudError>;
    async fn recognize_category(&self, product_name: &str)
        -> Result<CategoryRecognition, CloudError>;
    async fn recognize_expiration(&self, image_url: &str)
        -> Result<ExpirationRecognition, CloudError>;
    async fn recognize_production_date(
        &self,
        image_url: &str,
    ) -> Result<ProductionDateRecognition, CloudError>;
}

// ---------------------------------------------------------------------------
// Ark chat-completions client
// ---------------------------------------------------------------------------

/// [`VisionService`] backed by the Ark chat-completions API.
pub struct ArkVisionClient {
    client: reqwest::Client,
    config: ArkConfig,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

impl ArkVisionClient {
    pub fn new(client: reqwest::Client, config: ArkConfig) -> Self {
        Self { client, config }
    }

    /// Send one user message and return the model's text reply.
    async fn complete(&self, content: serde_json::Value) -> Result<String, CloudError> {
        let body = serde_json::json!({
            "model": self.config.chat_model,
            "messages": [{ "role": "user", "content": content }],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(SERVICE, response).await?;
        let chat: ChatResponse = response.json().await?;

        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CloudError::Decode {
                service: SERVICE,
                detail: "reply had no choices".into(),
            })
    }

    async fn ask_about_image<T: DeserializeOwned>(
        &self,
        prompt: &str,
        image_url: &str,
    ) -> Result<T, CloudError> {
        let content = serde_json::json!([
            { "type": "text", "text": prompt },
            { "type": "image_url", "image_url": { "url": image_url } },
        ]);
        let reply = self.complete(content).await?;
        parse_model_json(&reply)
    }
}

#[async_trait]
impl VisionService for ArkVisionClient {
    async fn recognize_product(&self, image_url: &str) -> Result<ProductRecognition, CloudError> {
        self.ask_about_image(PRODUCT_PROMPT, image_url).await
    }

    async fn recognize_category(
        &self,
        product_name: &str,
    ) -> Result<CategoryRecognition, CloudError> {
        let reply = self
            .complete(serde_json::Value::String(format!("{CATEGORY_PROMPT}{product_name}")))
            .await?;
        parse_model_json(&reply)
    }

    async fn recognize_expiration(
        &self,
        image_url: &str,
    ) -> Result<ExpirationRecognition, CloudError> {
        self.ask_about_image(EXPIRATION_PROMPT, image_url).await
    }

    async fn recognize_production_date(
        &self,
        image_url: &str,
    ) -> Result<ProductionDateRecognition, CloudError> {
        self.ask_about_image(PRODUCTION_DATE_PROMPT, image_url).await
    }
}

/// Strip a surrounding Markdown code fence (with or without a language tag).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) up to the first newline.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the JSON object in a model reply.
pub fn parse_model_json<T: DeserializeOwned>(reply: &str) -> Result<T, CloudError> {
    serde_json::from_str(strip_code_fences(reply)).map_err(|e| {
        let excerpt: String = reply.chars().take(150).collect();
        tracing::warn!(error = %e, excerpt, "Unparseable recognition reply");
        CloudError::Decode {
            service: SERVICE,
            detail: e.to_string(),
        }
    })
}
