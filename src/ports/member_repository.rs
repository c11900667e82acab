//! Workspace member repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId, WorkspaceId};
use crate::domain::workspace::{WorkspaceMember, WorkspaceRole};

/// Repository port for workspace membership rows.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a membership row.
    ///
    /// # Errors
    ///
    /// `AlreadyMember` when a row for (workspace, user) exists.
    async fn insert(&self, member: &WorkspaceMember) -> Result<(), DomainError>;

    /// The active membership row for (workspace, user), if any.
    ///
    /// Pending rows do not resolve; role resolution only sees active ones.
    async fn find_active(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<Option<WorkspaceMember>, DomainError>;

    /// All membership rows of a workspace.
    async fn list_for_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<WorkspaceMember>, DomainError>;

    /// Change a member's role.
    ///
    /// # Errors
    ///
    /// `MemberNotFound` when no row exists.
    async fn update_role(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
        role: WorkspaceRole,
    ) -> Result<(), DomainError>;

    /// Remove a member from the workspace.
    ///
    /// # Errors
    ///
    /// `MemberNotFound` when no row exists.
    async fn remove(&self, workspace_id: &WorkspaceId, user_id: &UserId)
        -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MemberRepository) {}
    }
}
