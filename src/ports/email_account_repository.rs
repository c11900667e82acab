//! Email account repository port.

use async_trait::async_trait;

use crate::domain::email_account::EmailAccount;
use crate::domain::foundation::{DomainError, EmailAccountId, UserId};

/// Repository port for connected email accounts.
#[async_trait]
pub trait EmailAccountRepository: Send + Sync {
    /// Save a newly connected account.
    async fn insert(&self, account: &EmailAccount) -> Result<(), DomainError>;

    /// Number of active accounts for the user. Deactivated accounts do not
    /// count against the plan limit.
    async fn count_active(&self, user_id: &UserId) -> Result<u32, DomainError>;

    /// All accounts (active and inactive) for the user.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<EmailAccount>, DomainError>;

    /// Find an account by id.
    async fn find_by_id(&self, id: &EmailAccountId) -> Result<Option<EmailAccount>, DomainError>;

    /// Soft-deactivate an account, freeing its quota slot.
    async fn deactivate(&self, id: &EmailAccountId) -> Result<(), DomainError>;
}
