//! Environment configuration for the cloud services.
//!
//! Each service group is optional. A group is enabled when its key variable
//! is set; once enabled, its other required variables must be present too,
//! otherwise startup panics naming the missing variable.

/// Default Ark (Volcengine) API base URL.
pub const DEFAULT_ARK_BASE_URL: &str = "https://ark.cn-beijing.volces.com/api/v3";

/// Default barcode catalog endpoint.
pub const DEFAULT_BARCODE_API_URL: &str = "https://tsbarcode.market.alicloudapi.com/barcode/index";

#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub access_key_secret: String,
    /// Base for public object URLs; defaults to `https://<bucket>.<endpoint host>`.
    pub public_base_url: String,
}

#[derive(Debug, Clone)]
pub struct ArkConfig {
    pub api_key: String,
    pub base_url: String,
    /// Endpoint id of the vision chat model.
    pub chat_model: String,
    /// Endpoint id of the multimodal embedding model.
    pub embedding_model: String,
}

#[derive(Debug, Clone)]
pub struct DashVectorConfig {
    /// Collection base URL, e.g. `https://<cluster>/v1/collections/<name>`.
    pub endpoint: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct BarcodeConfig {
    pub app_code: String,
    pub api_url: String,
}

/// All cloud service settings. `None` groups fall back to `Unconfigured`.
#[derive(Debug, Clone, Default)]
pub struct CloudConfig {
    pub object_store: Option<ObjectStoreConfig>,
    pub ark: Option<ArkConfig>,
    pub dashvector: Option<DashVectorConfig>,
    pub barcode: Option<BarcodeConfig>,
}

impl CloudConfig {
    /// Load cloud configuration from environment variables.
    ///
    /// | Env Var                 | Required when group enabled | Default                  |
    /// |-------------------------|-----------------------------|--------------------------|
    /// | `OSS_BUCKET`            | enables object storage      | --                       |
    /// | `OSS_ENDPOINT`          | yes                         | --                       |
    /// | `OSS_REGION`            | no                          | `oss-cn-hangzhou`        |
    /// | `OSS_ACCESS_KEY_ID`     | yes                         | --                       |
    /// | `OSS_ACCESS_KEY_SECRET` | yes                         | --                       |
    /// | `OSS_PUBLIC_BASE_URL`   | no                          | bucket virtual host      |
    /// | `ARK_API_KEY`           | enables vision + embeddings | --                       |
    /// | `ARK_BASE_URL`          | no                          | [`DEFAULT_ARK_BASE_URL`] |
    /// | `ARK_CHAT_MODEL`        | yes                         | --                       |
    /// | `ARK_EMBEDDING_MODEL`   | yes                         | --                       |
    /// | `DASHVECTOR_API_KEY`    | enables the vector index    | --                       |
    /// | `DASHVECTOR_ENDPOINT`   | yes                         | --                       |
    /// | `BARCODE_APPCODE`       | enables barcode lookup      | --                       |
    /// | `BARCODE_API_URL`       | no                          | [`DEFAULT_BARCODE_API_URL`] |
    ///
    /// # Panics
    ///
    /// Panics if an enabled group is missing a required variable.
    pub fn from_env() -> Self {
        let object_store = optional_var("OSS_BUCKET").map(|bucket| {
            let endpoint = required_var("OSS_ENDPOINT", "OSS_BUCKET");
            let public_base_url = optional_var("OSS_PUBLIC_BASE_URL")
                .unwrap_or_else(|| virtual_host_url(&endpoint, &bucket));
            ObjectStoreConfig {
                region: optional_var("OSS_REGION").unwrap_or_else(|| "oss-cn-hangzhou".into()),
                access_key_id: required_var("OSS_ACCESS_KEY_ID", "OSS_BUCKET"),
                access_key_secret: required_var("OSS_ACCESS_KEY_SECRET", "OSS_BUCKET"),
                endpoint,
                bucket,
                public_base_url,
            }
        });

        let ark = optional_var("ARK_API_KEY").map(|api_key| ArkConfig {
            api_key,
            base_url: optional_var("ARK_BASE_URL").unwrap_or_else(|| DEFAULT_ARK_BASE_URL.into()),
            chat_model: required_var("ARK_CHAT_MODEL", "ARK_API_KEY"),
            embedding_model: required_var("ARK_EMBEDDING_MODEL", "ARK_API_KEY"),
        });

        let dashvector = optional_var("DASHVECTOR_API_KEY").map(|api_key| DashVectorConfig {
            endpoint: required_var("DASHVECTOR_ENDPOINT", "DASHVECTOR_API_KEY"),
            api_key,
        });

        let barcode = optional_var("BARCODE_APPCODE").map(|app_code| BarcodeConfig {
            app_code,
            api_url: optional_var("BARCODE_API_URL")
                .unwrap_or_else(|| DEFAULT_BARCODE_API_URL.into()),
        });

        Self {
            object_store,
            ark,
            dashvector,
            barcode,
        }
    }
}

/// A set, non-blank environment variable.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_var(name: &str, enabled_by: &str) -> String {
    optional_var(name).unwrap_or_else(|| panic!("{name} must be set when {enabled_by} is set"))
}

/// `https://oss-cn-hangzhou.aliyuncs.com` + `bucket` -> `https://bucket.oss-cn-hangzhou.aliyuncs.com`.
fn virtual_host_url(endpoint: &str, bucket: &str) -> String {
    let host = endpoint
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    format!("https://{bucket}.{host}")
}
