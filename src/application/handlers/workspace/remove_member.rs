//! RemoveMemberHandler - Remove a member from a workspace.
//!
//! The designated owner can never be removed. Owners remove anyone else;
//! admins remove only plain members.

use std::sync::Arc;

use crate::application::handlers::access::WorkspaceAccess;
use crate::domain::foundation::{UserId, WorkspaceId};
use crate::domain::workspace::{can_remove_member, WorkspaceError};
use crate::ports::{MemberRepository, WorkspaceRepository};

/// Command to remove a member.
#[derive(Debug, Clone)]
pub struct RemoveMemberCommand {
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub target_user_id: UserId,
}

/// Handler for member removal.
pub struct RemoveMemberHandler {
    workspaces: Arc<dyn WorkspaceRepository>,
    members: Arc<dyn MemberRepository>,
    access: Arc<WorkspaceAccess>,
}

impl RemoveMemberHandler {
    pub fn new(
        workspaces: Arc<dyn WorkspaceRepository>,
        members: Arc<dyn MemberRepository>,
        access: Arc<WorkspaceAccess>,
    ) -> Self {
        Self {
            workspaces,
            members,
            access,
        }
    }

    pub async fn handle(&self, cmd: RemoveMemberCommand) -> Result<(), WorkspaceError> {
        let workspace = self
            .workspaces
            .find_by_id(&cmd.workspace_id)
            .await?
            .ok_or(WorkspaceError::WorkspaceNotFound(cmd.workspace_id))?;

        let requester_role = self.access.role_in(&workspace, &cmd.user_id).await?;
        let target_is_owner = workspace.is_owned_by(&cmd.target_user_id);

        if target_is_owner {
            return Err(WorkspaceError::forbidden("remove the workspace owner"));
        }

        let target = self
            .members
            .find_active(&cmd.workspace_id, &cmd.target_user_id)
            .await?
            .ok_or_else(|| WorkspaceError::member_not_found(cmd.target_user_id.clone()))?;

        if !can_remove_member(requester_role, target_is_owner, target.role) {
            return Err(WorkspaceError::forbidden("remove this member"));
        }

        self.members
            .remove(&cmd.workspace_id, &cmd.target_user_id)
            .await?;

        tracing::info!(
            workspace_id = %cmd.workspace_id,
            removed = %cmd.target_user_id,
            by = %cmd.user_id,
            "member removed"
        );
        Ok(())
    }
}
