//! Request/response DTOs for workspace endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::workspace::{Workspace, WorkspaceInvite, WorkspaceMember, WorkspaceRole};

#[derive(Debug, Serialize)]
pub struct WorkspaceResponse {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub logo_url: Option<String>,
    pub created_at: Timestamp,
}

impl From<Workspace> for WorkspaceResponse {
    fn from(ws: Workspace) -> Self {
        Self {
            id: ws.id.to_string(),
            name: ws.name,
            kind: ws.kind.as_str().to_string(),
            logo_url: ws.logo_url,
            created_at: ws.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListWorkspacesResponse {
    pub owned: Vec<WorkspaceResponse>,
    pub member_of: Vec<WorkspaceResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct InviteMemberRequest {
    pub email: String,
    pub role: WorkspaceRole,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub token: String,
    pub email: String,
    pub role: WorkspaceRole,
    pub expires_at: Timestamp,
}

impl From<WorkspaceInvite> for InviteResponse {
    fn from(invite: WorkspaceInvite) -> Self {
        Self {
            token: invite.token.to_string(),
            email: invite.email,
            role: invite.proposed_role,
            expires_at: invite.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub workspace_id: String,
    pub user_id: String,
    pub role: WorkspaceRole,
    pub status: String,
}

impl From<WorkspaceMember> for MemberResponse {
    fn from(member: WorkspaceMember) -> Self {
        Self {
            workspace_id: member.workspace_id.to_string(),
            user_id: member.user_id.to_string(),
            role: member.role,
            status: member.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeMemberRoleRequest {
    pub role: WorkspaceRole,
}

#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    pub role: Option<WorkspaceRole>,
    pub capabilities: crate::domain::workspace::RoleCapabilities,
}
