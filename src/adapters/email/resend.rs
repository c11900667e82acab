//! Resend mailer adapter.
//!
//! Dispatches transactional email over the Resend REST API. Callers treat
//! sends as fire-and-forget; failures are surfaced for logging only.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::ports::{Mailer, MailerError, OutboundEmail};

/// Request timeout for the Resend API.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    /// API key (re_...).
    api_key: SecretString,

    /// Sender address shown to recipients.
    from_address: String,

    /// Base URL for the Resend API.
    api_base_url: String,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from_address: from_address.into(),
            api_base_url: "https://api.resend.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Mailer implementation over the Resend REST API.
pub struct ResendMailer {
    config: ResendConfig,
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        let url = format!("{}/emails", self.config.api_base_url);
        let body = SendRequest {
            from: &self.config.from_address,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html_body,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %error_text, "Resend send failed");
            return Err(MailerError(format!("{}: {}", status, error_text)));
        }

        Ok(())
    }
}
