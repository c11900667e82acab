//! Workspace membership join entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, WorkspaceId};

use super::WorkspaceRole;

/// Membership row status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Row exists but the member has not completed joining.
    Pending,
    /// Full member; counts for role resolution.
    Active,
}

impl MemberStatus {
    /// Lowercase storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Active => "active",
        }
    }

    /// Parses the lowercase storage form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MemberStatus::Pending),
            "active" => Some(MemberStatus::Active),
            _ => None,
        }
    }
}

/// A non-owner user's membership in a workspace.
///
/// The workspace owner's effective role is derived from the workspace's
/// owner field; an explicit owner row may exist (organizations insert one)
/// but is never required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMember {
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
    pub role: WorkspaceRole,
    pub status: MemberStatus,
    pub invited_by: Option<UserId>,
    pub created_at: Timestamp,
}

impl WorkspaceMember {
    /// Creates an active membership.
    pub fn active(
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: WorkspaceRole,
        invited_by: Option<UserId>,
    ) -> Self {
        Self {
            workspace_id,
            user_id,
            role,
            status: MemberStatus::Active,
            invited_by,
            created_at: Timestamp::now(),
        }
    }

    /// The explicit owner row organizations insert at creation.
    pub fn owner_row(workspace_id: WorkspaceId, owner_id: UserId) -> Self {
        Self::active(workspace_id, owner_id, WorkspaceRole::Owner, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_membership_counts_immediately() {
        let member = WorkspaceMember::active(
            WorkspaceId::new(),
            UserId::new("user-1").unwrap(),
            WorkspaceRole::Member,
            Some(UserId::new("admin-1").unwrap()),
        );
        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.role, WorkspaceRole::Member);
    }

    #[test]
    fn owner_row_carries_owner_role_without_inviter() {
        let member = WorkspaceMember::owner_row(WorkspaceId::new(), UserId::new("o").unwrap());
        assert_eq!(member.role, WorkspaceRole::Owner);
        assert_eq!(member.invited_by, None);
    }

    #[test]
    fn status_storage_form_roundtrips() {
        for status in [MemberStatus::Pending, MemberStatus::Active] {
            assert_eq!(MemberStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(MemberStatus::parse("invited"), None);
    }
}
