//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own dto/handlers/routes triple; the full
//! API router is assembled here.

pub mod billing;
pub mod email_account;
pub mod error;
pub mod middleware;
pub mod state;
pub mod workspace;

pub use error::{ApiError, ErrorResponse};
pub use middleware::AuthenticatedUser;
pub use state::AppState;

use axum::Router;

/// Assemble the complete API router.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/workspaces", workspace::workspace_routes())
        .nest("/api/invites", workspace::invite_routes())
        .nest("/api/billing", billing::billing_routes())
        .nest("/api/invoices", billing::invoice_routes())
        .nest("/api/webhooks", billing::webhook_routes())
        .nest("/api/email-accounts", email_account::email_account_routes())
        .with_state(state)
}
