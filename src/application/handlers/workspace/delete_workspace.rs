//! DeleteWorkspaceHandler - Command handler for workspace deletion.
//!
//! Owner-only. Deletion cascades to everything hanging off the workspace
//! in one transaction; a partial delete is never observable.

use std::sync::Arc;

use crate::application::handlers::access::WorkspaceAccess;
use crate::domain::foundation::{UserId, WorkspaceId};
use crate::domain::workspace::{RoleCapabilities, WorkspaceError};
use crate::ports::WorkspaceRepository;

/// Command to delete a workspace.
#[derive(Debug, Clone)]
pub struct DeleteWorkspaceCommand {
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
}

/// Handler for workspace deletion.
pub struct DeleteWorkspaceHandler {
    workspaces: Arc<dyn WorkspaceRepository>,
    access: Arc<WorkspaceAccess>,
}

impl DeleteWorkspaceHandler {
    pub fn new(workspaces: Arc<dyn WorkspaceRepository>, access: Arc<WorkspaceAccess>) -> Self {
        Self { workspaces, access }
    }

    pub async fn handle(&self, cmd: DeleteWorkspaceCommand) -> Result<(), WorkspaceError> {
        let workspace = self
            .workspaces
            .find_by_id(&cmd.workspace_id)
            .await?
            .ok_or(WorkspaceError::WorkspaceNotFound(cmd.workspace_id))?;

        let role = self.access.role_in(&workspace, &cmd.user_id).await?;
        if !RoleCapabilities::for_role(role).delete_workspace {
            return Err(WorkspaceError::forbidden("delete this workspace"));
        }

        self.workspaces.delete_cascade(&cmd.workspace_id).await?;
        tracing::info!(
            user_id = %cmd.user_id,
            workspace_id = %cmd.workspace_id,
            "workspace deleted"
        );
        Ok(())
    }
}
