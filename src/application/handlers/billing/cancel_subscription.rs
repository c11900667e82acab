//! CancelSubscriptionHandler - Command handler for subscription cancellation.
//!
//! Two paths:
//!
//! - A trial with no payment-provider customer is cancelled purely
//!   locally; no provider call exists to make.
//! - A paid subscription is cancelled at period end on the provider side,
//!   then the cache records `cancelled` with access lasting until the
//!   period boundary.

use std::sync::Arc;

use crate::application::single_flight::KeyedLock;
use crate::domain::billing::{select_cancellable, BillingError, BillingProfile};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{BillingProfileRepository, PaymentProvider, UpdateResult};

/// Default cancellation reason recorded as provider metadata.
const DEFAULT_CANCEL_REASON: &str = "user_requested";

/// Command to cancel the user's subscription.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub user_id: UserId,
    pub reason: Option<String>,
}

/// Result of a successful cancellation.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionResult {
    pub profile: BillingProfile,
    /// When access actually ends.
    pub effective_at: Option<Timestamp>,
}

/// Handler for subscription cancellation.
pub struct CancelSubscriptionHandler {
    profiles: Arc<dyn BillingProfileRepository>,
    payments: Arc<dyn PaymentProvider>,
    locks: Arc<KeyedLock>,
}

impl CancelSubscriptionHandler {
    pub fn new(
        profiles: Arc<dyn BillingProfileRepository>,
        payments: Arc<dyn PaymentProvider>,
        locks: Arc<KeyedLock>,
    ) -> Self {
        Self {
            profiles,
            payments,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<CancelSubscriptionResult, BillingError> {
        let _guard = self.locks.acquire(cmd.user_id.as_str()).await;

        let mut profile = self.profiles.find_or_default(&cmd.user_id).await?;

        // Duplicate cancellation short-circuits as a conflict.
        if profile.is_cancelled() {
            return Err(BillingError::AlreadyCancelled);
        }

        let now = Timestamp::now();

        match profile.stripe_customer_id.clone() {
            None if profile.is_trial => {
                profile.cancel_trial_locally(now);
                self.persist(&profile).await?;

                tracing::info!(user_id = %cmd.user_id, "trial cancelled locally");
                Ok(CancelSubscriptionResult {
                    effective_at: profile.subscription_ends_at,
                    profile,
                })
            }

            None => Err(BillingError::no_payment_account(cmd.user_id)),

            Some(customer_id) => {
                let subscriptions = self.payments.list_subscriptions(&customer_id).await?;
                let current = select_cancellable(&subscriptions)
                    .ok_or(BillingError::NoCurrentSubscription)?;

                let reason = cmd.reason.as_deref().unwrap_or(DEFAULT_CANCEL_REASON);
                let updated = self
                    .payments
                    .cancel_at_period_end(&current.id, reason)
                    .await?;

                let ends_at = Timestamp::from_unix_secs(updated.current_period_end);
                profile.mark_cancelled(updated.id, ends_at, now);
                self.persist(&profile).await?;

                tracing::info!(
                    user_id = %cmd.user_id,
                    ends_at = %ends_at,
                    "subscription cancelled at period end"
                );
                Ok(CancelSubscriptionResult {
                    effective_at: Some(ends_at),
                    profile,
                })
            }
        }
    }

    async fn persist(&self, profile: &BillingProfile) -> Result<(), BillingError> {
        match self.profiles.update(profile).await? {
            UpdateResult::Updated => Ok(()),
            UpdateResult::StaleVersion => Err(BillingError::ConcurrentUpdate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::billing::SubscriptionStatus;
    use crate::ports::{PaymentError, ProviderSubscription, ProviderSubscriptionStatus};

    fn test_user_id() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn subscription(id: &str, status: ProviderSubscriptionStatus) -> ProviderSubscription {
        ProviderSubscription {
            id: id.to_string(),
            customer_id: "cus_1".to_string(),
            status,
            price_id: Some("price_pro_monthly".to_string()),
            cancel_at_period_end: false,
            current_period_start: 1_700_000_000,
            current_period_end: 1_702_592_000,
            trial_start: None,
            trial_end: None,
            created: 1_700_000_000,
            canceled_at: None,
        }
    }

    fn handler(
        store: &InMemoryStore,
        payments: Arc<MockPaymentProvider>,
    ) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(
            Arc::new(store.clone()),
            payments,
            Arc::new(KeyedLock::new()),
        )
    }

    async fn seed_trial_profile(store: &InMemoryStore) {
        let mut profile = BillingProfile::new(test_user_id());
        profile.is_trial = true;
        profile.trial_ends_at = Some(Timestamp::now().add_days(10));
        profile.subscription_status = Some(SubscriptionStatus::Trialing);
        store.seed_profile(profile).await;
    }

    async fn seed_paid_profile(store: &InMemoryStore) {
        let mut profile = BillingProfile::new(test_user_id());
        profile.stripe_customer_id = Some("cus_1".to_string());
        profile.subscription_status = Some(SubscriptionStatus::Active);
        store.seed_profile(profile).await;
    }

    #[tokio::test]
    async fn trial_without_customer_cancels_locally_with_zero_provider_calls() {
        let store = InMemoryStore::new();
        seed_trial_profile(&store).await;
        let payments = Arc::new(MockPaymentProvider::new());

        let result = handler(&store, payments.clone())
            .handle(CancelSubscriptionCommand {
                user_id: test_user_id(),
                reason: None,
            })
            .await
            .unwrap();

        assert!(payments.calls().is_empty());
        assert!(result.profile.is_cancelled());
        assert!(result.profile.trial_consumed);
        assert!(!result.profile.is_trial);
    }

    #[tokio::test]
    async fn trial_cancellation_freezes_end_to_trial_end() {
        let store = InMemoryStore::new();
        seed_trial_profile(&store).await;
        let trial_end = store.stored_profile(&test_user_id()).unwrap().trial_ends_at;

        let result = handler(&store, Arc::new(MockPaymentProvider::new()))
            .handle(CancelSubscriptionCommand {
                user_id: test_user_id(),
                reason: None,
            })
            .await
            .unwrap();

        assert_eq!(result.effective_at, trial_end);
    }

    #[tokio::test]
    async fn paid_cancellation_schedules_at_period_end() {
        let store = InMemoryStore::new();
        seed_paid_profile(&store).await;
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_customer("cus_1")
                .with_subscription(subscription("sub_1", ProviderSubscriptionStatus::Active)),
        );

        let result = handler(&store, payments.clone())
            .handle(CancelSubscriptionCommand {
                user_id: test_user_id(),
                reason: Some("too expensive".to_string()),
            })
            .await
            .unwrap();

        assert!(result.profile.is_cancelled());
        assert_eq!(
            result.effective_at,
            Some(Timestamp::from_unix_secs(1_702_592_000))
        );
        // The provider cancels at period end, never immediately.
        assert!(payments.subscription("sub_1").unwrap().cancel_at_period_end);
        assert_eq!(payments.cancel_reasons(), vec!["too expensive"]);
    }

    #[tokio::test]
    async fn paid_cancellation_defaults_the_reason() {
        let store = InMemoryStore::new();
        seed_paid_profile(&store).await;
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_subscription(subscription("sub_1", ProviderSubscriptionStatus::Active)),
        );

        handler(&store, payments.clone())
            .handle(CancelSubscriptionCommand {
                user_id: test_user_id(),
                reason: None,
            })
            .await
            .unwrap();

        assert_eq!(payments.cancel_reasons(), vec!["user_requested"]);
    }

    #[tokio::test]
    async fn past_due_subscription_is_still_cancellable() {
        let store = InMemoryStore::new();
        seed_paid_profile(&store).await;
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_subscription(subscription("sub_1", ProviderSubscriptionStatus::PastDue)),
        );

        let result = handler(&store, payments)
            .handle(CancelSubscriptionCommand {
                user_id: test_user_id(),
                reason: None,
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn already_cancelled_is_a_conflict() {
        let store = InMemoryStore::new();
        let mut profile = BillingProfile::new(test_user_id());
        profile.subscription_status = Some(SubscriptionStatus::Cancelled);
        store.seed_profile(profile).await;
        let payments = Arc::new(MockPaymentProvider::new());

        let err = handler(&store, payments.clone())
            .handle(CancelSubscriptionCommand {
                user_id: test_user_id(),
                reason: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err, BillingError::AlreadyCancelled);
        assert!(payments.calls().is_empty());
    }

    #[tokio::test]
    async fn non_trial_without_customer_is_rejected() {
        let store = InMemoryStore::new();
        store.seed_profile(BillingProfile::new(test_user_id())).await;

        let err = handler(&store, Arc::new(MockPaymentProvider::new()))
            .handle(CancelSubscriptionCommand {
                user_id: test_user_id(),
                reason: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::NoPaymentAccount(_)));
    }

    #[tokio::test]
    async fn no_live_subscription_is_not_found() {
        let store = InMemoryStore::new();
        seed_paid_profile(&store).await;
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_subscription(subscription("sub_old", ProviderSubscriptionStatus::Canceled)),
        );

        let err = handler(&store, payments)
            .handle(CancelSubscriptionCommand {
                user_id: test_user_id(),
                reason: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err, BillingError::NoCurrentSubscription);
    }

    #[tokio::test]
    async fn provider_failure_leaves_the_cache_untouched() {
        let store = InMemoryStore::new();
        seed_paid_profile(&store).await;
        let before = store.stored_profile(&test_user_id()).unwrap();
        let payments = Arc::new(
            MockPaymentProvider::new().failing_with(PaymentError::network("connection reset")),
        );

        let err = handler(&store, payments)
            .handle(CancelSubscriptionCommand {
                user_id: test_user_id(),
                reason: None,
            })
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(store.stored_profile(&test_user_id()).unwrap(), before);
    }

    #[tokio::test]
    async fn multiple_live_subscriptions_cancel_the_newest() {
        let store = InMemoryStore::new();
        seed_paid_profile(&store).await;
        let mut older = subscription("sub_old", ProviderSubscriptionStatus::Active);
        older.created = 100;
        let mut newer = subscription("sub_new", ProviderSubscriptionStatus::Active);
        newer.created = 200;
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_subscription(older)
                .with_subscription(newer),
        );

        handler(&store, payments.clone())
            .handle(CancelSubscriptionCommand {
                user_id: test_user_id(),
                reason: None,
            })
            .await
            .unwrap();

        assert!(payments.subscription("sub_new").unwrap().cancel_at_period_end);
        assert!(!payments.subscription("sub_old").unwrap().cancel_at_period_end);
    }
}
