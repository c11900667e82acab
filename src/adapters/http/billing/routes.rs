//! Axum router for billing endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::super::state::AppState;
use super::handlers::{
    cancel_subscription, get_entitlements, handle_stripe_webhook, list_plans,
    reactivate_subscription, record_invoice_usage, sync_plan,
};

/// Billing routes, mounted at `/api/billing`.
pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/entitlements", get(get_entitlements))
        .route("/cancel", post(cancel_subscription))
        .route("/reactivate", post(reactivate_subscription))
        .route("/sync", post(sync_plan))
}

/// Invoice usage routes, mounted at `/api/invoices`.
pub fn invoice_routes() -> Router<AppState> {
    Router::new().route("/usage", post(record_invoice_usage))
}

/// Webhook routes, mounted at `/api/webhooks`.
///
/// Separate from the authenticated routes: webhooks carry no session and
/// are authenticated by signature instead.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}
