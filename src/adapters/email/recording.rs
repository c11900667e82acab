//! Recording mailer.
//!
//! Captures outbound email in memory instead of sending it. Used by tests
//! and by local development without a Resend key.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{Mailer, MailerError, OutboundEmail};

/// Mailer that records instead of sending.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    fail: Mutex<bool>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send fail.
    pub fn failing() -> Self {
        let mailer = Self::default();
        *mailer.fail.lock().unwrap() = true;
        mailer
    }

    /// Emails captured so far.
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError> {
        if *self.fail.lock().unwrap() {
            return Err(MailerError("simulated send failure".to_string()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_email() {
        let mailer = RecordingMailer::new();
        mailer
            .send(OutboundEmail {
                to: "a@example.com".to_string(),
                subject: "Hi".to_string(),
                html_body: "<p>Hi</p>".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].to, "a@example.com");
    }

    #[tokio::test]
    async fn failing_mailer_fails() {
        let mailer = RecordingMailer::failing();
        let result = mailer
            .send(OutboundEmail {
                to: "a@example.com".to_string(),
                subject: "Hi".to_string(),
                html_body: "".to_string(),
            })
            .await;
        assert!(result.is_err());
        assert!(mailer.sent().is_empty());
    }
}
