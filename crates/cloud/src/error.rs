/// Errors from the cloud service clients.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The service has no credentials configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("{service} returned HTTP {status}: {body}")]
    Http {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The service answered 2xx but reported failure in its envelope.
    #[error("{service} reported error {code}: {message}")]
    Service {
        service: &'static str,
        code: i64,
        message: String,
    },

    /// A recognition reply carried a non-zero status.
    #[error("recognition failed (status {status}): {msg}")]
    Recognition { status: i64, msg: String },

    /// The reply could not be decoded.
    #[error("{service} returned an unreadable response: {detail}")]
    Decode {
        service: &'static str,
        detail: String,
    },

    /// Object storage failure.
    #[error("object storage error: {0}")]
    Storage(String),
}

impl CloudError {
    /// Short name of the failing service for activity logs.
    pub fn service(&self) -> &'static str {
        match self {
            Self::NotConfigured(service)
            | Self::Http { service, .. }
            | Self::Service { service, .. }
            | Self::Decode { service, .. } => service,
            Self::Recognition { .. } => "vision",
            Self::Storage(_) => "object-store",
            Self::Request(_) => "http",
        }
    }
}

/// Return the response unchanged on 2xx, otherwise an [`CloudError::Http`]
/// carrying the status and body text.
pub(crate) async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, CloudError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(CloudError::Http {
            service,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
