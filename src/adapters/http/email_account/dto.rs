//! Request/response DTOs for email account endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::email_account::{EmailAccount, EmailProvider};
use crate::domain::foundation::{Timestamp, WorkspaceId};

#[derive(Debug, Deserialize)]
pub struct ConnectEmailAccountRequest {
    pub provider: EmailProvider,
    pub address: String,
    #[serde(default)]
    pub workspace_id: Option<WorkspaceId>,
}

#[derive(Debug, Serialize)]
pub struct EmailAccountResponse {
    pub id: String,
    pub provider: EmailProvider,
    pub address: String,
    pub is_active: bool,
    pub connected_at: Timestamp,
}

impl From<EmailAccount> for EmailAccountResponse {
    fn from(account: EmailAccount) -> Self {
        Self {
            id: account.id.to_string(),
            provider: account.provider,
            address: account.address,
            is_active: account.is_active,
            connected_at: account.connected_at,
        }
    }
}
