//! Delivery of login verification codes.

use async_trait::async_trait;
use stockroom_core::auth::mask_phone;

use crate::error::CloudError;

#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), CloudError>;
}

/// Gateway that only logs that a code was issued. The code itself is never
/// logged; use `SMS_TEST_MODE` to receive it in the API response.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSmsGateway;

#[async_trait]
impl SmsGateway for LoggingSmsGateway {
    async fn send_code(&self, phone: &str, _code: &str) -> Result<(), CloudError> {
        tracing::info!(phone = %mask_phone(phone), "Verification code issued");
        Ok(())
    }
}
