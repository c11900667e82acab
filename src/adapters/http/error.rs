//! HTTP error mapping.
//!
//! Translates domain errors into status codes and a uniform error body.
//! Quota errors carry the current count and limit so clients can render
//! "N of M used".

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::domain::billing::BillingError;
use crate::domain::email_account::EmailAccountError;
use crate::domain::workspace::WorkspaceError;
use crate::ports::AuthError;

/// Uniform error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Workspace(WorkspaceError),
    Billing(BillingError),
    EmailAccount(EmailAccountError),
    Unauthenticated(AuthError),
    BadRequest(String),
}

impl From<WorkspaceError> for ApiError {
    fn from(err: WorkspaceError) -> Self {
        ApiError::Workspace(err)
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        ApiError::Billing(err)
    }
}

impl From<EmailAccountError> for ApiError {
    fn from(err: EmailAccountError) -> Self {
        ApiError::EmailAccount(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthenticated(err)
    }
}

fn workspace_response(err: &WorkspaceError) -> (StatusCode, ErrorResponse) {
    let status = match err {
        WorkspaceError::Forbidden { .. } | WorkspaceError::QuotaExceeded { .. } => {
            StatusCode::FORBIDDEN
        }
        WorkspaceError::WorkspaceNotFound(_)
        | WorkspaceError::MemberNotFound { .. }
        | WorkspaceError::InviteNotFound => StatusCode::NOT_FOUND,
        WorkspaceError::InviteExpired => StatusCode::GONE,
        WorkspaceError::InviteAlreadyAccepted | WorkspaceError::AlreadyMember { .. } => {
            StatusCode::CONFLICT
        }
        WorkspaceError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        WorkspaceError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut body = ErrorResponse::new(err.code().to_string(), err.message());
    if let WorkspaceError::QuotaExceeded { current, limit, .. } = err {
        body = body
            .with_detail("current", current.to_string())
            .with_detail("limit", limit.to_string());
    }
    (status, body)
}

fn billing_response(err: &BillingError) -> (StatusCode, ErrorResponse) {
    let status = match err {
        BillingError::NoPaymentAccount(_) => StatusCode::BAD_REQUEST,
        BillingError::CustomerNotFound { .. } | BillingError::NoCurrentSubscription => {
            StatusCode::NOT_FOUND
        }
        BillingError::AlreadyCancelled
        | BillingError::SubscriptionTerminated
        | BillingError::ReactivationDenied
        | BillingError::ConcurrentUpdate => StatusCode::CONFLICT,
        BillingError::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
        BillingError::PlanNotIdentified { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        BillingError::InvalidWebhookSignature => StatusCode::UNAUTHORIZED,
        BillingError::Provider { .. } => StatusCode::BAD_GATEWAY,
        BillingError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut body = ErrorResponse::new(err.code().to_string(), err.message());
    if let BillingError::QuotaExceeded { current, limit } = err {
        body = body
            .with_detail("current", current.to_string())
            .with_detail("limit", limit.to_string());
    }
    (status, body)
}

fn email_account_response(err: &EmailAccountError) -> (StatusCode, ErrorResponse) {
    let (status, code) = match err {
        EmailAccountError::QuotaExceeded { .. } => (StatusCode::FORBIDDEN, "QUOTA_EXCEEDED"),
        EmailAccountError::NotFound(_) => (StatusCode::NOT_FOUND, "EMAIL_ACCOUNT_NOT_FOUND"),
        EmailAccountError::NotOwned => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        EmailAccountError::ValidationFailed { .. } => {
            (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
        }
        EmailAccountError::Infrastructure(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };

    let mut body = ErrorResponse::new(code, err.message());
    if let EmailAccountError::QuotaExceeded { current, limit } = err {
        body = body
            .with_detail("current", current.to_string())
            .with_detail("limit", limit.to_string());
    }
    (status, body)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self {
            ApiError::Workspace(err) => workspace_response(err),
            ApiError::Billing(err) => billing_response(err),
            ApiError::EmailAccount(err) => email_account_response(err),
            ApiError::Unauthenticated(err) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHORIZED", err.to_string()),
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", message.clone()),
            ),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = ?self, "request failed");
        }

        (status, Json(body)).into_response()
    }
}
