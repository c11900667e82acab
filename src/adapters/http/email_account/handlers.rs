//! HTTP handlers for email account endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::email_account::{
    ConnectEmailAccountCommand, DisconnectEmailAccountCommand,
};
use crate::domain::email_account::EmailAccountError;
use crate::domain::foundation::EmailAccountId;

use super::super::error::ApiError;
use super::super::middleware::AuthenticatedUser;
use super::super::state::AppState;
use super::dto::{ConnectEmailAccountRequest, EmailAccountResponse};

/// GET /api/email-accounts - List the caller's connected mailboxes
pub async fn list_email_accounts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let accounts = state
        .email_accounts
        .list_for_user(&user.user_id)
        .await
        .map_err(EmailAccountError::from)?;

    Ok(Json(
        accounts
            .into_iter()
            .map(EmailAccountResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/email-accounts - Record a connected mailbox
pub async fn connect_email_account(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<ConnectEmailAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .connect_email_account_handler()
        .handle(ConnectEmailAccountCommand {
            user_id: user.user_id,
            workspace_id: request.workspace_id,
            provider: request.provider,
            address: request.address,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EmailAccountResponse::from(result.account)),
    ))
}

/// DELETE /api/email-accounts/:id - Disconnect a mailbox
pub async fn disconnect_email_account(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let account_id = id.parse::<EmailAccountId>().map_err(|_| {
        ApiError::EmailAccount(EmailAccountError::validation("id", "not an account id"))
    })?;

    state
        .disconnect_email_account_handler()
        .handle(DisconnectEmailAccountCommand {
            user_id: user.user_id,
            account_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
