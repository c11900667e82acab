//! ChangeMemberRoleHandler - Change a member's role.
//!
//! Only the owner may hand out the `owner` role; admins may adjust
//! non-owner roles on non-owner targets and may never touch the designated
//! owner.

use std::sync::Arc;

use crate::application::handlers::access::WorkspaceAccess;
use crate::domain::foundation::{UserId, WorkspaceId};
use crate::domain::workspace::{can_assign_role, WorkspaceError, WorkspaceMember, WorkspaceRole};
use crate::ports::{MemberRepository, WorkspaceRepository};

/// Command to change a member's role.
#[derive(Debug, Clone)]
pub struct ChangeMemberRoleCommand {
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub target_user_id: UserId,
    pub new_role: WorkspaceRole,
}

/// Result of a successful role change.
#[derive(Debug, Clone)]
pub struct ChangeMemberRoleResult {
    pub member: WorkspaceMember,
}

/// Handler for member role changes.
pub struct ChangeMemberRoleHandler {
    workspaces: Arc<dyn WorkspaceRepository>,
    members: Arc<dyn MemberRepository>,
    access: Arc<WorkspaceAccess>,
}

impl ChangeMemberRoleHandler {
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

    pub async fn handle(
        &self,
        cmd: ChangeMemberRoleCommand,
    ) -> Result<ChangeMemberRoleResult, WorkspaceError> {
        let workspace = self
            .workspaces
            .find_by_id(&cmd.workspace_id)
            .await?
            .ok_or(WorkspaceError::WorkspaceNotFound(cmd.workspace_id))?;

        let requester_role = self.access.role_in(&workspace, &cmd.user_id).await?;
        let target_is_owner = workspace.is_owned_by(&cmd.target_user_id);

        if !can_assign_role(requester_role, target_is_owner, cmd.new_role) {
            return Err(WorkspaceError::forbidden(format!(
                "set role {} on this member",
                cmd.new_role
            )));
        }

        let mut target = self
            .members
            .find_active(&cmd.workspace_id, &cmd.target_user_id)
            .await?
            .ok_or_else(|| WorkspaceError::member_not_found(cmd.target_user_id.clone()))?;

        self.members
            .update_role(&cmd.workspace_id, &cmd.target_user_id, cmd.new_role)
            .await?;
        target.role = cmd.new_role;

        tracing::info!(
            workspace_id = %cmd.workspace_id,
            target = %cmd.target_user_id,
            new_role = %cmd.new_role,
            by = %cmd.user_id,
            "member role changed"
        );
        Ok(ChangeMemberRoleResult { member: target })
    }
}
