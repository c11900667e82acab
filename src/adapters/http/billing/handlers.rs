//! HTTP handlers for billing endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::billing::{
    CancelSubscriptionCommand, ReactivateSubscriptionCommand, ReactivationOutcome,
    RecordInvoiceUsageCommand, SyncOutcome, SyncPlanCommand,
};
use crate::domain::billing::BillingError;
use crate::domain::foundation::UserId;

use super::super::error::ApiError;
use super::super::middleware::AuthenticatedUser;
use super::super::state::AppState;
use super::dto::{
    CancelSubscriptionRequest, CancelSubscriptionResponse, EntitlementsResponse,
    InvoiceUsageResponse, PlanCatalogEntry, ReactivateSubscriptionResponse,
    SubscriptionStateResponse, SyncPlanResponse,
};

/// GET /api/billing/plans - The static plan catalog
pub async fn list_plans() -> impl IntoResponse {
    Json(PlanCatalogEntry::catalog())
}

/// GET /api/billing/entitlements - Plan limits and current usage
pub async fn get_entitlements(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .billing_profiles
        .find_or_default(&user.user_id)
        .await
        .map_err(BillingError::from)?;

    Ok(Json(EntitlementsResponse::from_profile(&profile)))
}

/// POST /api/billing/cancel - Cancel the subscription
pub async fn cancel_subscription(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CancelSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .cancel_subscription_handler()
        .handle(CancelSubscriptionCommand {
            user_id: user.user_id,
            reason: request.reason,
        })
        .await?;

    Ok(Json(CancelSubscriptionResponse {
        state: SubscriptionStateResponse::from(&result.profile),
        effective_at: result.effective_at,
    }))
}

/// POST /api/billing/reactivate - Undo a pending cancellation
pub async fn reactivate_subscription(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .reactivate_subscription_handler()
        .handle(ReactivateSubscriptionCommand {
            user_id: user.user_id,
        })
        .await?;

    let outcome = match result.outcome {
        ReactivationOutcome::Resumed => "resumed",
        ReactivationOutcome::AlreadyActive => "already_active",
    };

    Ok(Json(ReactivateSubscriptionResponse {
        state: SubscriptionStateResponse::from(&result.profile),
        outcome: outcome.to_string(),
    }))
}

/// POST /api/billing/sync - Pull reconciliation from the provider
pub async fn sync_plan(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .sync_plan_handler()
        .handle(SyncPlanCommand {
            user_id: user.user_id,
        })
        .await?;

    let outcome = match result.outcome {
        SyncOutcome::Synced => "synced",
        SyncOutcome::Expired => "expired",
        SyncOutcome::NoChange => "no_change",
    };

    Ok(Json(SyncPlanResponse {
        state: SubscriptionStateResponse::from(&result.profile),
        outcome: outcome.to_string(),
    }))
}

/// POST /api/invoices/usage - Consume one unit of invoice quota
pub async fn record_invoice_usage(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .record_invoice_usage_handler()
        .handle(RecordInvoiceUsageCommand {
            user_id: user.user_id,
        })
        .await?;

    Ok(Json(InvoiceUsageResponse {
        period: result.period,
        used: result.used,
        limit: result.limit,
    }))
}

/// POST /api/webhooks/stripe - Signature-verified provider events
///
/// Every handled event triggers the same pull reconciliation for the
/// affected customer, so the webhook can never write state the sync path
/// could not.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing Stripe-Signature header".to_string()))?;

    let event = state
        .payments
        .verify_webhook(&body, signature)
        .await
        .map_err(BillingError::from)?;

    if !event.event_type.triggers_sync() {
        tracing::debug!(event_id = %event.id, "ignoring unhandled webhook event type");
        return Ok(StatusCode::OK);
    }

    let Some(customer_id) = event.customer_id else {
        tracing::debug!(event_id = %event.id, "webhook event carries no customer");
        return Ok(StatusCode::OK);
    };

    let Some(profile) = state
        .billing_profiles
        .find_by_customer_id(&customer_id)
        .await
        .map_err(BillingError::from)?
    else {
        tracing::warn!(customer_id = %customer_id, "webhook for unknown customer");
        return Ok(StatusCode::OK);
    };

    let user_id: UserId = profile.user_id;
    match state
        .sync_plan_handler()
        .handle(SyncPlanCommand {
            user_id: user_id.clone(),
        })
        .await
    {
        Ok(_) => {}
        // Ack anyway; the provider retries transport failures, and a sync
        // that cannot identify the plan will not improve on redelivery.
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "webhook-triggered sync failed")
        }
    }

    Ok(StatusCode::OK)
}
