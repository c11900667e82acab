//! Connected email accounts.
//!
//! An email account is the product of a completed OAuth connection (the
//! token dance itself happens outside this service). Only active accounts
//! count against the plan's email-account limit; disconnecting deactivates
//! the row and frees quota.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EmailAccountId, Timestamp, UserId, ValidationError, WorkspaceId};

/// Supported mailbox providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Gmail,
    Outlook,
}

impl EmailProvider {
    /// Lowercase storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailProvider::Gmail => "gmail",
            EmailProvider::Outlook => "outlook",
        }
    }

    /// Parses the lowercase storage form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gmail" => Some(EmailProvider::Gmail),
            "outlook" => Some(EmailProvider::Outlook),
            _ => None,
        }
    }
}

/// A mailbox connected for invoice extraction.
///
/// The limit is evaluated per user; the workspace reference only records
/// which shared space the mailbox was connected into (None for the
/// personal space) so workspace deletion can take its accounts with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAccount {
    pub id: EmailAccountId,
    pub user_id: UserId,
    pub workspace_id: Option<WorkspaceId>,
    pub provider: EmailProvider,
    pub address: String,
    pub is_active: bool,
    pub connected_at: Timestamp,
}

impl EmailAccount {
    /// Records a freshly connected mailbox.
    ///
    /// # Errors
    ///
    /// Rejects an address without an `@`.
    pub fn connect(
        user_id: UserId,
        workspace_id: Option<WorkspaceId>,
        provider: EmailProvider,
        address: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let address = address.into();
        if !address.contains('@') {
            return Err(ValidationError::invalid_format("address", "missing @"));
        }
        Ok(Self {
            id: EmailAccountId::new(),
            user_id,
            workspace_id,
            provider,
            address,
            is_active: true,
            connected_at: Timestamp::now(),
        })
    }
}

/// Email account errors.
///
/// # HTTP Status Mapping
///
/// | Error | HTTP Status |
/// |-------|-------------|
/// | QuotaExceeded | 403 |
/// | NotFound | 404 |
/// | NotOwned | 403 |
/// | ValidationFailed | 400 |
/// | Infrastructure | 500 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailAccountError {
    /// Plan limit for connected accounts reached.
    QuotaExceeded { current: u32, limit: u32 },

    /// Account does not exist.
    NotFound(EmailAccountId),

    /// Account belongs to a different user.
    NotOwned,

    /// Input validation failed.
    ValidationFailed { field: String, message: String },

    /// Storage failure.
    Infrastructure(String),
}

impl EmailAccountError {
    pub fn quota_exceeded(current: u32, limit: u32) -> Self {
        EmailAccountError::QuotaExceeded { current, limit }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EmailAccountError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EmailAccountError::Infrastructure(message.into())
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            EmailAccountError::QuotaExceeded { current, limit } => format!(
                "Plan limit reached: {} of {} email accounts connected",
                current, limit
            ),
            EmailAccountError::NotFound(id) => format!("Email account not found: {}", id),
            EmailAccountError::NotOwned => {
                "Email account belongs to a different user".to_string()
            }
            EmailAccountError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            EmailAccountError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for EmailAccountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EmailAccountError {}

impl From<crate::domain::foundation::DomainError> for EmailAccountError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        EmailAccountError::Infrastructure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_creates_active_account() {
        let account = EmailAccount::connect(
            UserId::new("user-1").unwrap(),
            None,
            EmailProvider::Gmail,
            "inbox@example.com",
        )
        .unwrap();
        assert!(account.is_active);
        assert_eq!(account.provider, EmailProvider::Gmail);
        assert_eq!(account.workspace_id, None);
    }

    #[test]
    fn connect_rejects_bad_address() {
        let result = EmailAccount::connect(
            UserId::new("user-1").unwrap(),
            None,
            EmailProvider::Outlook,
            "not-an-address",
        );
        assert!(result.is_err());
    }

    #[test]
    fn provider_storage_form_roundtrips() {
        for provider in [EmailProvider::Gmail, EmailProvider::Outlook] {
            assert_eq!(EmailProvider::parse(provider.as_str()), Some(provider));
        }
        assert_eq!(EmailProvider::parse("yahoo"), None);
    }

    #[test]
    fn quota_error_carries_count_and_limit() {
        let err = EmailAccountError::quota_exceeded(3, 3);
        assert!(err.message().contains("3 of 3"));
    }
}
