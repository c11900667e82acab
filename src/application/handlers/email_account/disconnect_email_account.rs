//! DisconnectEmailAccountHandler - Soft-deactivate a mailbox.
//!
//! Disconnected accounts keep their row (extraction history references
//! them) but stop counting against the plan limit.

use std::sync::Arc;

use crate::domain::email_account::EmailAccountError;
use crate::domain::foundation::{EmailAccountId, UserId};
use crate::ports::EmailAccountRepository;

/// Command to disconnect a mailbox.
#[derive(Debug, Clone)]
pub struct DisconnectEmailAccountCommand {
    pub user_id: UserId,
    pub account_id: EmailAccountId,
}

/// Handler for email account disconnection.
pub struct DisconnectEmailAccountHandler {
    accounts: Arc<dyn EmailAccountRepository>,
}

impl DisconnectEmailAccountHandler {
    pub fn new(accounts: Arc<dyn EmailAccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn handle(
        &self,
        cmd: DisconnectEmailAccountCommand,
    ) -> Result<(), EmailAccountError> {
        let account = self
            .accounts
            .find_by_id(&cmd.account_id)
            .await?
            .ok_or(EmailAccountError::NotFound(cmd.account_id))?;

        if account.user_id != cmd.user_id {
            return Err(EmailAccountError::NotOwned);
        }

        self.accounts.deactivate(&cmd.account_id).await?;
        tracing::info!(
            user_id = %cmd.user_id,
            account_id = %cmd.account_id,
            "email account disconnected"
        );
        Ok(())
    }
}
