//! Email configuration (Resend).

use serde::Deserialize;

use super::error::ValidationError;

/// Transactional email configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailConfig {
    /// Resend API key (re_...).
    pub resend_api_key: String,

    /// Sender address.
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

fn default_from_address() -> String {
    "Bilibou <noreply@bilibou.app>".to_string()
}

impl EmailConfig {
    /// Validate email configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resend_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("RESEND_API_KEY"));
        }
        if !self.resend_api_key.starts_with("re_") {
            return Err(ValidationError::invalid(
                "email.resend_api_key",
                "must start with re_",
            ));
        }
        if self.from_address.is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL_FROM_ADDRESS"));
        }
        Ok(())
    }
}
