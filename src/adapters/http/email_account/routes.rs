//! Axum router for email account endpoints.

use axum::routing::{delete, get};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{connect_email_account, disconnect_email_account, list_email_accounts};

/// Email account routes, mounted at `/api/email-accounts`.
pub fn email_account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_email_accounts).post(connect_email_account))
        .route("/:id", delete(disconnect_email_account))
}
