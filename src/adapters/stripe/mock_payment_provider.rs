//! In-memory payment provider.
//!
//! Simulates the provider's subscription store for tests and for running
//! the service locally without Stripe credentials. Records every call so
//! tests can assert that an operation stayed local.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{
    PaymentError, PaymentProvider, ProviderCustomer, ProviderSubscription, WebhookEvent,
    WebhookEventType,
};

/// Signature accepted by the mock webhook verifier.
pub const MOCK_WEBHOOK_SIGNATURE: &str = "mock-signature";

/// Mock payment provider backed by process memory.
#[derive(Default)]
pub struct MockPaymentProvider {
    customers: Mutex<Vec<ProviderCustomer>>,
    subscriptions: Mutex<Vec<ProviderSubscription>>,
    calls: Mutex<Vec<String>>,
    cancel_reasons: Mutex<Vec<String>>,
    fail_all: Mutex<Option<PaymentError>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a customer.
    pub fn with_customer(self, id: &str) -> Self {
        self.customers.lock().unwrap().push(ProviderCustomer {
            id: id.to_string(),
            email: Some(format!("{}@example.com", id)),
            created_at: 1_700_000_000,
        });
        self
    }

    /// Register a subscription.
    pub fn with_subscription(self, subscription: ProviderSubscription) -> Self {
        self.subscriptions.lock().unwrap().push(subscription);
        self
    }

    /// Make every subsequent call fail with the given error.
    pub fn failing_with(self, error: PaymentError) -> Self {
        *self.fail_all.lock().unwrap() = Some(error);
        self
    }

    /// Names of the provider calls made so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Cancellation reasons recorded as provider metadata.
    pub fn cancel_reasons(&self) -> Vec<String> {
        self.cancel_reasons.lock().unwrap().clone()
    }

    /// Current state of a stored subscription.
    pub fn subscription(&self, id: &str) -> Option<ProviderSubscription> {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    fn record(&self, call: &str) -> Result<(), PaymentError> {
        self.calls.lock().unwrap().push(call.to_string());
        if let Some(err) = self.fail_all.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn get_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<ProviderCustomer>, PaymentError> {
        self.record("get_customer")?;
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == customer_id)
            .cloned())
    }

    async fn list_subscriptions(
        &self,
        customer_id: &str,
    ) -> Result<Vec<ProviderSubscription>, PaymentError> {
        self.record("list_subscriptions")?;
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn cancel_at_period_end(
        &self,
        subscription_id: &str,
        reason: &str,
    ) -> Result<ProviderSubscription, PaymentError> {
        self.record("cancel_at_period_end")?;
        self.cancel_reasons.lock().unwrap().push(reason.to_string());

        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = subscriptions
            .iter_mut()
            .find(|s| s.id == subscription_id)
            .ok_or_else(|| PaymentError::not_found("subscription"))?;
        subscription.cancel_at_period_end = true;
        Ok(subscription.clone())
    }

    async fn resume_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, PaymentError> {
        self.record("resume_subscription")?;

        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = subscriptions
            .iter_mut()
            .find(|s| s.id == subscription_id)
            .ok_or_else(|| PaymentError::not_found("subscription"))?;
        subscription.cancel_at_period_end = false;
        Ok(subscription.clone())
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.record("verify_webhook")?;

        if signature != MOCK_WEBHOOK_SIGNATURE {
            return Err(PaymentError::invalid_webhook("Invalid signature"));
        }

        let value: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::invalid_webhook(format!("Invalid JSON: {}", e)))?;

        let event_type = match value.get("type").and_then(|t| t.as_str()) {
            Some("customer.subscription.created") => WebhookEventType::SubscriptionCreated,
            Some("customer.subscription.updated") => WebhookEventType::SubscriptionUpdated,
            Some("customer.subscription.deleted") => WebhookEventType::SubscriptionDeleted,
            Some("invoice.paid") => WebhookEventType::InvoicePaid,
            Some("invoice.payment_failed") => WebhookEventType::InvoicePaymentFailed,
            Some(other) => WebhookEventType::Unknown(other.to_string()),
            None => return Err(PaymentError::invalid_webhook("Missing event type")),
        };

        Ok(WebhookEvent {
            id: value
                .get("id")
                .and_then(|i| i.as_str())
                .unwrap_or("evt_mock")
                .to_string(),
            event_type,
            customer_id: value
                .get("customer")
                .and_then(|c| c.as_str())
                .map(|c| c.to_string()),
            created_at: value.get("created").and_then(|c| c.as_i64()).unwrap_or(0),
        })
    }
}
