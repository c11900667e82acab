//! Payment provider port.
//!
//! Defines the contract for the external payment gateway (Stripe in
//! production). The provider holds the authoritative subscription record;
//! this port only reads it and flips cancellation flags, it never invents
//! state.
//!
//! # Design
//!
//! - **Gateway agnostic**: the reconciler sees provider-neutral types
//! - **Idempotent**: every operation can be safely retried
//! - **Bounded**: implementations must apply a request timeout and surface
//!   transport failures as retryable errors

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for the payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Look up a customer. Returns `None` for unknown or deleted customers
    /// (stale ids from another environment land here).
    async fn get_customer(&self, customer_id: &str)
        -> Result<Option<ProviderCustomer>, PaymentError>;

    /// All subscriptions belonging to a customer, in any status.
    async fn list_subscriptions(
        &self,
        customer_id: &str,
    ) -> Result<Vec<ProviderSubscription>, PaymentError>;

    /// Schedule cancellation at period end, recording the reason as
    /// provider-side metadata. The subscription stays live until then.
    async fn cancel_at_period_end(
        &self,
        subscription_id: &str,
        reason: &str,
    ) -> Result<ProviderSubscription, PaymentError>;

    /// Clear a pending cancel-at-period-end flag.
    async fn resume_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, PaymentError>;

    /// Verify a webhook signature and parse the event.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError>;
}

/// Customer in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCustomer {
    /// Provider's customer id.
    pub id: String,

    /// Customer email.
    pub email: Option<String>,

    /// When the customer was created (provider timestamp).
    pub created_at: i64,
}

/// Subscription as reported by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSubscription {
    /// Provider's subscription id.
    pub id: String,

    /// Provider's customer id.
    pub customer_id: String,

    /// Raw provider status.
    pub status: ProviderSubscriptionStatus,

    /// Price id identifying what was bought.
    pub price_id: Option<String>,

    /// Whether the subscription terminates at the period boundary.
    pub cancel_at_period_end: bool,

    /// Current billing period start (Unix seconds).
    pub current_period_start: i64,

    /// Current billing period end (Unix seconds).
    pub current_period_end: i64,

    /// Trial start (Unix seconds), if any.
    pub trial_start: Option<i64>,

    /// Trial end (Unix seconds), if any.
    pub trial_end: Option<i64>,

    /// When the subscription was created (Unix seconds). Used as the
    /// deterministic tie-break when several subscriptions qualify.
    pub created: i64,

    /// When cancellation was requested, if any (Unix seconds).
    pub canceled_at: Option<i64>,
}

/// Subscription status vocabulary of the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderSubscriptionStatus {
    Trialing,
    Active,
    PastDue,
    Unpaid,
    Canceled,
    Incomplete,
    IncompleteExpired,
    Paused,
    Unknown,
}

impl ProviderSubscriptionStatus {
    /// Parses the provider's wire form.
    pub fn parse(s: &str) -> Self {
        match s {
            "trialing" => ProviderSubscriptionStatus::Trialing,
            "active" => ProviderSubscriptionStatus::Active,
            "past_due" => ProviderSubscriptionStatus::PastDue,
            "unpaid" => ProviderSubscriptionStatus::Unpaid,
            "canceled" => ProviderSubscriptionStatus::Canceled,
            "incomplete" => ProviderSubscriptionStatus::Incomplete,
            "incomplete_expired" => ProviderSubscriptionStatus::IncompleteExpired,
            "paused" => ProviderSubscriptionStatus::Paused,
            _ => ProviderSubscriptionStatus::Unknown,
        }
    }
}

/// Webhook event from the payment provider.
///
/// Only the affected customer matters downstream: every handled event
/// triggers the same pull reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event id from the provider.
    pub id: String,

    /// Event type.
    pub event_type: WebhookEventType,

    /// Customer the event concerns, when the payload carries one.
    pub customer_id: Option<String>,

    /// When the event occurred (Unix seconds).
    pub created_at: i64,
}

/// Webhook event types we react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionDeleted,
    InvoicePaid,
    InvoicePaymentFailed,
    Unknown(String),
}

impl WebhookEventType {
    /// True if the event should trigger a reconciliation.
    pub fn triggers_sync(&self) -> bool {
        !matches!(self, WebhookEventType::Unknown(_))
    }
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Network/timeout failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// API authentication failure.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Provider-side entity missing.
    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    /// Invalid webhook payload or signature.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }

    /// Generic provider API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue or timeout.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Invalid webhook signature or payload.
    InvalidWebhook,

    /// Provider API error (4xx/5xx).
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
