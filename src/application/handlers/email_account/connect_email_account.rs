//! ConnectEmailAccountHandler - Record a connected mailbox.
//!
//! The OAuth exchange with Gmail/Outlook happens outside this service;
//! by the time this handler runs we have a verified mailbox address. The
//! plan's email-account limit is enforced here, counting active accounts
//! only and comparing strictly less-than.

use std::sync::Arc;

use crate::domain::email_account::{EmailAccount, EmailAccountError, EmailProvider};
use crate::domain::foundation::{UserId, WorkspaceId};
use crate::domain::plan::{can_add_email_account, PlanLimits};
use crate::ports::{BillingProfileRepository, EmailAccountRepository};

/// Command to record a connected mailbox.
#[derive(Debug, Clone)]
pub struct ConnectEmailAccountCommand {
    pub user_id: UserId,
    /// Shared workspace the mailbox is connected into; None for the
    /// personal space.
    pub workspace_id: Option<WorkspaceId>,
    pub provider: EmailProvider,
    pub address: String,
}

/// Result of a successful connection.
#[derive(Debug, Clone)]
pub struct ConnectEmailAccountResult {
    pub account: EmailAccount,
}

/// Handler for email account connection.
pub struct ConnectEmailAccountHandler {
    accounts: Arc<dyn EmailAccountRepository>,
    profiles: Arc<dyn BillingProfileRepository>,
}

impl ConnectEmailAccountHandler {
    pub fn new(
        accounts: Arc<dyn EmailAccountRepository>,
        profiles: Arc<dyn BillingProfileRepository>,
    ) -> Self {
        Self { accounts, profiles }
    }

    pub async fn handle(
        &self,
        cmd: ConnectEmailAccountCommand,
    ) -> Result<ConnectEmailAccountResult, EmailAccountError> {
        let profile = self.profiles.find_or_default(&cmd.user_id).await?;
        let plan = profile.selected_plan;

        let active = self.accounts.count_active(&cmd.user_id).await?;
        if !can_add_email_account(plan, active) {
            let limit = plan
                .and_then(|p| PlanLimits::for_plan(p).max_email_accounts)
                .unwrap_or(1);
            return Err(EmailAccountError::quota_exceeded(active, limit));
        }

        let account = EmailAccount::connect(
            cmd.user_id.clone(),
            cmd.workspace_id,
            cmd.provider,
            cmd.address,
        )
        .map_err(|e| EmailAccountError::validation("address", e.to_string()))?;
        self.accounts.insert(&account).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            account_id = %account.id,
            "email account connected"
        );
        Ok(ConnectEmailAccountResult { account })
    }
}
