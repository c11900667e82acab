//! Workspace repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId, WorkspaceId};
use crate::domain::workspace::Workspace;

/// Repository port for workspace persistence.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Save a new workspace.
    async fn insert(&self, workspace: &Workspace) -> Result<(), DomainError>;

    /// Find a workspace by id. Inactive workspaces resolve to `None`.
    async fn find_by_id(&self, id: &WorkspaceId) -> Result<Option<Workspace>, DomainError>;

    /// Find a user's personal workspace, if it exists yet.
    async fn find_personal(&self, owner_id: &UserId) -> Result<Option<Workspace>, DomainError>;

    /// All active workspaces owned by the user.
    async fn list_owned(&self, owner_id: &UserId) -> Result<Vec<Workspace>, DomainError>;

    /// All active workspaces the user is an active member of (excluding
    /// those they own).
    async fn list_member_of(&self, user_id: &UserId) -> Result<Vec<Workspace>, DomainError>;

    /// Number of active organization workspaces owned by the user.
    ///
    /// Feeds the organization entitlement check; personal workspaces and
    /// deactivated organizations do not count.
    async fn count_active_organizations(&self, owner_id: &UserId) -> Result<u32, DomainError>;

    /// Delete the workspace and everything hanging off it (invoices,
    /// email-account links, invites, members) in one transaction.
    async fn delete_cascade(&self, id: &WorkspaceId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn WorkspaceRepository) {}
    }
}
