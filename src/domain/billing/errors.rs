//! Billing-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NoPaymentAccount | 400 |
//! | CustomerNotFound | 404 |
//! | NoCurrentSubscription | 404 |
//! | AlreadyCancelled | 409 |
//! | SubscriptionTerminated | 409 |
//! | ReactivationDenied | 409 |
//! | ConcurrentUpdate | 409 |
//! | QuotaExceeded | 403 |
//! | PlanNotIdentified | 422 |
//! | InvalidWebhookSignature | 401 |
//! | Provider | 502 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{ErrorCode, UserId};

/// Billing and reconciliation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// Operation requires a payment-provider customer and none is linked.
    NoPaymentAccount(UserId),

    /// The linked customer id no longer exists at the provider.
    ///
    /// The stale id has been purged from the cache as a corrective action.
    CustomerNotFound { customer_id: String },

    /// No subscription in a cancellable/live status was found.
    NoCurrentSubscription,

    /// Subscription is already scheduled for cancellation.
    AlreadyCancelled,

    /// Subscription is fully terminated; reactivation requires a new checkout.
    SubscriptionTerminated,

    /// Nothing to reactivate: no pending cancellation and no live subscription.
    ReactivationDenied,

    /// Monthly invoice quota reached.
    QuotaExceeded { current: u32, limit: u32 },

    /// Provider price id does not map to any known plan.
    PlanNotIdentified { price_id: String },

    /// Webhook signature verification failed.
    InvalidWebhookSignature,

    /// Another reconciliation won the write race; safe to retry.
    ConcurrentUpdate,

    /// Provider call failed (network, 5xx, timeout). Retryable.
    Provider { message: String, retryable: bool },

    /// Storage failure.
    Infrastructure(String),
}

impl BillingError {
    pub fn no_payment_account(user_id: UserId) -> Self {
        BillingError::NoPaymentAccount(user_id)
    }

    pub fn customer_not_found(customer_id: impl Into<String>) -> Self {
        BillingError::CustomerNotFound {
            customer_id: customer_id.into(),
        }
    }

    pub fn quota_exceeded(current: u32, limit: u32) -> Self {
        BillingError::QuotaExceeded { current, limit }
    }

    pub fn plan_not_identified(price_id: impl Into<String>) -> Self {
        BillingError::PlanNotIdentified {
            price_id: price_id.into(),
        }
    }

    pub fn provider(message: impl Into<String>, retryable: bool) -> Self {
        BillingError::Provider {
            message: message.into(),
            retryable,
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BillingError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BillingError::NoPaymentAccount(_) => ErrorCode::ValidationFailed,
            BillingError::CustomerNotFound { .. } => ErrorCode::CustomerNotFound,
            BillingError::NoCurrentSubscription => ErrorCode::SubscriptionNotFound,
            BillingError::AlreadyCancelled
            | BillingError::SubscriptionTerminated
            | BillingError::ReactivationDenied => ErrorCode::Conflict,
            BillingError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            BillingError::PlanNotIdentified { .. } => ErrorCode::PlanNotIdentified,
            BillingError::InvalidWebhookSignature => ErrorCode::InvalidWebhookSignature,
            BillingError::ConcurrentUpdate => ErrorCode::ConcurrentUpdate,
            BillingError::Provider { .. } => ErrorCode::PaymentProviderError,
            BillingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            BillingError::NoPaymentAccount(user_id) => {
                format!("User {} has no payment account linked", user_id)
            }
            BillingError::CustomerNotFound { customer_id } => {
                format!("Payment customer {} no longer exists", customer_id)
            }
            BillingError::NoCurrentSubscription => "No current subscription found".to_string(),
            BillingError::AlreadyCancelled => {
                "Subscription is already scheduled for cancellation".to_string()
            }
            BillingError::SubscriptionTerminated => {
                "Subscription has fully ended; start a new checkout to resubscribe".to_string()
            }
            BillingError::ReactivationDenied => {
                "No cancellation-pending subscription to reactivate".to_string()
            }
            BillingError::QuotaExceeded { current, limit } => {
                format!("Plan limit reached: {} of {} invoices used this month", current, limit)
            }
            BillingError::PlanNotIdentified { price_id } => {
                format!("Price {} does not map to a known plan", price_id)
            }
            BillingError::InvalidWebhookSignature => "Invalid webhook signature".to_string(),
            BillingError::ConcurrentUpdate => {
                "Billing profile was updated concurrently; retry".to_string()
            }
            BillingError::Provider { message, .. } => {
                format!("Payment provider error: {}", message)
            }
            BillingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if retrying the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            BillingError::Provider { retryable, .. } => *retryable,
            BillingError::ConcurrentUpdate | BillingError::Infrastructure(_) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BillingError {}

impl From<crate::ports::PaymentError> for BillingError {
    fn from(err: crate::ports::PaymentError) -> Self {
        BillingError::Provider {
            message: err.message,
            retryable: err.retryable,
        }
    }
}

impl From<crate::domain::foundation::DomainError> for BillingError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        BillingError::Infrastructure(err.to_string())
    }
}
