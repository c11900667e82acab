//! HTTP handlers for workspace endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::workspace::{
    AcceptInviteCommand, ChangeMemberRoleCommand, CreateOrganizationCommand,
    DeleteWorkspaceCommand, InviteMemberCommand, ListWorkspacesQuery, RemoveMemberCommand,
};
use crate::application::handlers::access::WorkspaceSelector;
use crate::domain::foundation::{InviteToken, UserId, WorkspaceId};
use crate::domain::workspace::{RoleCapabilities, WorkspaceError};

use super::super::error::ApiError;
use super::super::middleware::AuthenticatedUser;
use super::super::state::AppState;
use super::dto::{
    ChangeMemberRoleRequest, CreateOrganizationRequest, InviteMemberRequest, InviteResponse,
    ListWorkspacesResponse, MemberResponse, PermissionsResponse, WorkspaceResponse,
};

fn parse_workspace_id(raw: &str) -> Result<WorkspaceId, ApiError> {
    raw.parse::<WorkspaceId>().map_err(|_| {
        ApiError::Workspace(WorkspaceError::validation("workspace_id", "not a workspace id"))
    })
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    UserId::new(raw)
        .map_err(|e| ApiError::Workspace(WorkspaceError::validation("user_id", e.to_string())))
}

/// GET /api/workspaces - List the caller's workspaces
pub async fn list_workspaces(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .list_workspaces_handler()
        .handle(ListWorkspacesQuery {
            user_id: user.user_id,
        })
        .await?;

    Ok(Json(ListWorkspacesResponse {
        owned: result.owned.into_iter().map(WorkspaceResponse::from).collect(),
        member_of: result
            .member_of
            .into_iter()
            .map(WorkspaceResponse::from)
            .collect(),
    }))
}

/// POST /api/workspaces - Create an organization
pub async fn create_organization(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .create_organization_handler()
        .handle(CreateOrganizationCommand {
            user_id: user.user_id,
            name: request.name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WorkspaceResponse::from(result.workspace)),
    ))
}

/// GET /api/workspaces/:id/permissions - The caller's role and capabilities
///
/// Accepts the `"personal"` sentinel, which resolves to owner without any
/// lookups.
pub async fn get_workspace_permissions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let selector = WorkspaceSelector::parse(&id)?;
    let role = state.access().resolve(&selector, &user.user_id).await?;

    Ok(Json(PermissionsResponse {
        role,
        capabilities: RoleCapabilities::for_role(role),
    }))
}

/// DELETE /api/workspaces/:id - Delete a workspace (cascades)
pub async fn delete_workspace(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let workspace_id = parse_workspace_id(&id)?;
    state
        .delete_workspace_handler()
        .handle(DeleteWorkspaceCommand {
            user_id: user.user_id,
            workspace_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/workspaces/:id/invites - Invite a member
pub async fn invite_member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<InviteMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let workspace_id = parse_workspace_id(&id)?;
    let result = state
        .invite_member_handler()
        .handle(InviteMemberCommand {
            user_id: user.user_id,
            workspace_id,
            email: request.email,
            proposed_role: request.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(InviteResponse::from(result.invite))))
}

/// POST /api/invites/:token/accept - Accept an invitation
pub async fn accept_invite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let token = InviteToken::new(token)
        .map_err(|e| ApiError::Workspace(WorkspaceError::validation("token", e.to_string())))?;

    let result = state
        .accept_invite_handler()
        .handle(AcceptInviteCommand {
            user_id: user.user_id,
            token,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from(result.member))))
}

/// DELETE /api/workspaces/:id/members/:user_id - Remove a member
pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, member_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let workspace_id = parse_workspace_id(&id)?;
    let target_user_id = parse_user_id(&member_id)?;

    state
        .remove_member_handler()
        .handle(RemoveMemberCommand {
            user_id: user.user_id,
            workspace_id,
            target_user_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/workspaces/:id/members/:user_id - Change a member's role
pub async fn change_member_role(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, member_id)): Path<(String, String)>,
    Json(request): Json<ChangeMemberRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let workspace_id = parse_workspace_id(&id)?;
    let target_user_id = parse_user_id(&member_id)?;

    let result = state
        .change_member_role_handler()
        .handle(ChangeMemberRoleCommand {
            user_id: user.user_id,
            workspace_id,
            target_user_id,
            new_role: request.role,
        })
        .await?;

    Ok(Json(MemberResponse::from(result.member)))
}
