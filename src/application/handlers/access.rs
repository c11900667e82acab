//! Workspace role resolution.
//!
//! Computes a requester's effective role for a target workspace. Order
//! matters and first match wins:
//!
//! 1. The `"personal"` sentinel bypasses every lookup; the requester is
//!    the sole owner of their personal space.
//! 2. The workspace's owner field resolves to `Owner`, terminal, with no
//!    membership query. An explicit owner membership row may exist for
//!    organizations; both representations resolve identically.
//! 3. An active membership row resolves to its recorded role.
//! 4. Otherwise: no access.

use std::str::FromStr;
use std::sync::Arc;

use crate::domain::foundation::{UserId, WorkspaceId};
use crate::domain::workspace::{Workspace, WorkspaceError, WorkspaceRole};
use crate::ports::{MemberRepository, WorkspaceRepository};

/// Target of a workspace-scoped request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceSelector {
    /// The requester's own personal space.
    Personal,

    /// A concrete workspace.
    Id(WorkspaceId),
}

impl WorkspaceSelector {
    /// Parses a path segment: the literal `"personal"` or a workspace id.
    pub fn parse(s: &str) -> Result<Self, WorkspaceError> {
        if s == "personal" {
            return Ok(WorkspaceSelector::Personal);
        }
        WorkspaceId::from_str(s)
            .map(WorkspaceSelector::Id)
            .map_err(|_| WorkspaceError::validation("workspace", "not a workspace id"))
    }
}

/// Role resolution service.
pub struct WorkspaceAccess {
    workspaces: Arc<dyn WorkspaceRepository>,
    members: Arc<dyn MemberRepository>,
}

impl WorkspaceAccess {
    pub fn new(
        workspaces: Arc<dyn WorkspaceRepository>,
        members: Arc<dyn MemberRepository>,
    ) -> Self {
        Self {
            workspaces,
            members,
        }
    }

    /// Effective role of `user` in an already-loaded workspace.
    pub async fn role_in(
        &self,
        workspace: &Workspace,
        user: &UserId,
    ) -> Result<Option<WorkspaceRole>, WorkspaceError> {
        if workspace.is_owned_by(user) {
            return Ok(Some(WorkspaceRole::Owner));
        }
        let member = self.members.find_active(&workspace.id, user).await?;
        Ok(member.map(|m| m.role))
    }

    /// Effective role of `user` for a selector.
    ///
    /// A missing workspace resolves to no access rather than an error;
    /// callers that need the 404 distinction load the workspace themselves.
    pub async fn resolve(
        &self,
        selector: &WorkspaceSelector,
        user: &UserId,
    ) -> Result<Option<WorkspaceRole>, WorkspaceError> {
        match selector {
            WorkspaceSelector::Personal => Ok(Some(WorkspaceRole::Owner)),
            WorkspaceSelector::Id(id) => match self.workspaces.find_by_id(id).await? {
                Some(workspace) => self.role_in(&workspace, user).await,
                None => Ok(None),
            },
        }
    }
}
