//! Transactional email port.
//!
//! Fire-and-forget: callers spawn the send and never let a mail failure
//! fail the originating request.

use async_trait::async_trait;

/// An email ready for dispatch.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Errors from the email dispatcher.
#[derive(Debug, Clone)]
pub struct MailerError(pub String);

impl std::fmt::Display for MailerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mail dispatch failed: {}", self.0)
    }
}

impl std::error::Error for MailerError {}

/// Port for transactional email dispatch.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one email.
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError>;
}
