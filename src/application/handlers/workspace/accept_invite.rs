//! AcceptInviteHandler - Consume an invitation.
//!
//! Acceptance validates expiry in the domain, then persists the accepted
//! invite and the new membership row in one transaction through the
//! repository.

use std::sync::Arc;

use crate::domain::foundation::{InviteToken, Timestamp, UserId};
use crate::domain::workspace::{WorkspaceError, WorkspaceMember};
use crate::ports::InviteRepository;

/// Command to accept an invitation.
#[derive(Debug, Clone)]
pub struct AcceptInviteCommand {
    pub user_id: UserId,
    pub token: InviteToken,
}

/// Result of a successful acceptance.
#[derive(Debug, Clone)]
pub struct AcceptInviteResult {
    pub member: WorkspaceMember,
}

/// Handler for invite acceptance.
pub struct AcceptInviteHandler {
    invites: Arc<dyn InviteRepository>,
}

impl AcceptInviteHandler {
    pub fn new(invites: Arc<dyn InviteRepository>) -> Self {
        Self { invites }
    }

    pub async fn handle(
        &self,
        cmd: AcceptInviteCommand,
    ) -> Result<AcceptInviteResult, WorkspaceError> {
        let mut invite = self
            .invites
            .find_by_token(&cmd.token)
            .await?
            .ok_or(WorkspaceError::InviteNotFound)?;

        invite.accept(Timestamp::now())?;

        let member = WorkspaceMember::active(
            invite.workspace_id,
            cmd.user_id.clone(),
            invite.proposed_role,
            Some(invite.created_by.clone()),
        );

        self.invites.complete(&invite, &member).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            workspace_id = %invite.workspace_id,
            role = %invite.proposed_role,
            "invite accepted"
        );
        Ok(AcceptInviteResult { member })
    }
}
