//! Axum router for workspace endpoints.

use axum::routing::{delete, get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{
    accept_invite, change_member_role, create_organization, delete_workspace,
    get_workspace_permissions, invite_member, list_workspaces, remove_member,
};

/// Workspace routes, mounted at `/api/workspaces`.
pub fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workspaces).post(create_organization))
        .route("/:id", delete(delete_workspace))
        .route("/:id/permissions", get(get_workspace_permissions))
        .route("/:id/invites", post(invite_member))
        .route(
            "/:id/members/:user_id",
            delete(remove_member).patch(change_member_role),
        )
}

/// Invite acceptance routes, mounted at `/api/invites`.
pub fn invite_routes() -> Router<AppState> {
    Router::new().route("/:token/accept", post(accept_invite))
}
