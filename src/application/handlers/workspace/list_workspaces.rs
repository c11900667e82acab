//! ListWorkspacesHandler - Query handler for a user's workspaces.
//!
//! The personal workspace is created lazily here: the first listing for a
//! user who has none inserts it, so every user always sees exactly one.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::workspace::{Workspace, WorkspaceError};
use crate::ports::WorkspaceRepository;

/// Query for the workspaces visible to a user.
#[derive(Debug, Clone)]
pub struct ListWorkspacesQuery {
    pub user_id: UserId,
}

/// Result of a workspace listing.
#[derive(Debug, Clone)]
pub struct ListWorkspacesResult {
    /// Workspaces the user owns, the personal one first.
    pub owned: Vec<Workspace>,
    /// Workspaces the user belongs to as a member.
    pub member_of: Vec<Workspace>,
}

/// Handler for workspace listing.
pub struct ListWorkspacesHandler {
    workspaces: Arc<dyn WorkspaceRepository>,
}

impl ListWorkspacesHandler {
    pub fn new(workspaces: Arc<dyn WorkspaceRepository>) -> Self {
        Self { workspaces }
    }

    pub async fn handle(
        &self,
        query: ListWorkspacesQuery,
    ) -> Result<ListWorkspacesResult, WorkspaceError> {
        // Lazy personal-workspace creation.
        if self.workspaces.find_personal(&query.user_id).await?.is_none() {
            let personal = Workspace::personal(query.user_id.clone());
            self.workspaces.insert(&personal).await?;
            tracing::debug!(user_id = %query.user_id, "personal workspace created lazily");
        }

        let (mut owned, member_of) = futures::try_join!(
            self.workspaces.list_owned(&query.user_id),
            self.workspaces.list_member_of(&query.user_id),
        )?;

        // Personal space first, then organizations by creation time.
        owned.sort_by_key(|w| (w.kind != crate::domain::workspace::WorkspaceKind::Personal, w.created_at));

        Ok(ListWorkspacesResult { owned, member_of })
    }
}
