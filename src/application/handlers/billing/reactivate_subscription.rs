//! ReactivateSubscriptionHandler - Undo a pending cancellation.
//!
//! A subscription scheduled for cancellation keeps running until period
//! end; until then the provider can simply clear the flag. A fully
//! terminated subscription cannot be revived and requires a new checkout.
//! Reactivating an already-active subscription is an idempotent resync,
//! not an error.

use std::sync::Arc;

use crate::application::single_flight::KeyedLock;
use crate::domain::billing::{find_reactivatable, project, BillingError, BillingProfile, Reactivatable};
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::plan::PriceTable;
use crate::ports::{BillingProfileRepository, PaymentProvider, UpdateResult};

/// Command to reactivate the user's subscription.
#[derive(Debug, Clone)]
pub struct ReactivateSubscriptionCommand {
    pub user_id: UserId,
}

/// How the reactivation concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactivationOutcome {
    /// A pending cancellation was cleared.
    Resumed,

    /// Nothing was pending; the cache was resynchronized.
    AlreadyActive,
}

/// Result of a successful reactivation.
#[derive(Debug, Clone)]
pub struct ReactivateSubscriptionResult {
    pub profile: BillingProfile,
    pub outcome: ReactivationOutcome,
}

/// Handler for subscription reactivation.
pub struct ReactivateSubscriptionHandler {
    profiles: Arc<dyn BillingProfileRepository>,
    payments: Arc<dyn PaymentProvider>,
    prices: Arc<PriceTable>,
    locks: Arc<KeyedLock>,
}

impl ReactivateSubscriptionHandler {
    pub fn new(
        profiles: Arc<dyn BillingProfileRepository>,
        payments: Arc<dyn PaymentProvider>,
        prices: Arc<PriceTable>,
        locks: Arc<KeyedLock>,
    ) -> Self {
        Self {
            profiles,
            payments,
            prices,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReactivateSubscriptionCommand,
    ) -> Result<ReactivateSubscriptionResult, BillingError> {
        let _guard = self.locks.acquire(cmd.user_id.as_str()).await;

        let mut profile = self.profiles.find_or_default(&cmd.user_id).await?;
        let customer_id = profile
            .stripe_customer_id
            .clone()
            .ok_or_else(|| BillingError::no_payment_account(cmd.user_id.clone()))?;

        let subscriptions = self.payments.list_subscriptions(&customer_id).await?;
        let now = Timestamp::now();

        match find_reactivatable(&subscriptions) {
            Reactivatable::Resume(pending) => {
                let resumed = self.payments.resume_subscription(&pending.id).await?;
                let projection = project(&resumed, &self.prices)?;
                profile.apply(&projection, now);
                self.persist(&profile).await?;

                tracing::info!(user_id = %cmd.user_id, "pending cancellation cleared");
                Ok(ReactivateSubscriptionResult {
                    profile,
                    outcome: ReactivationOutcome::Resumed,
                })
            }

            Reactivatable::AlreadyActive(live) => {
                let projection = project(live, &self.prices)?;
                profile.apply(&projection, now);
                self.persist(&profile).await?;

                tracing::info!(user_id = %cmd.user_id, "nothing pending; cache resynchronized");
                Ok(ReactivateSubscriptionResult {
                    profile,
                    outcome: ReactivationOutcome::AlreadyActive,
                })
            }

            Reactivatable::Terminated => Err(BillingError::SubscriptionTerminated),

            Reactivatable::Nothing => Err(BillingError::ReactivationDenied),
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
    use crate::domain::plan::PlanId;
    use crate::ports::{ProviderSubscription, ProviderSubscriptionStatus};

    fn test_user_id() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn prices() -> Arc<PriceTable> {
        Arc::new(PriceTable::from_pairs([("price_pro_monthly", PlanId::Pro)]))
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
    ) -> ReactivateSubscriptionHandler {
        ReactivateSubscriptionHandler::new(
            Arc::new(store.clone()),
            payments,
            prices(),
            Arc::new(KeyedLock::new()),
        )
    }

    async fn seed_cancelled_profile(store: &InMemoryStore) {
        let mut profile = BillingProfile::new(test_user_id());
        profile.stripe_customer_id = Some("cus_1".to_string());
        profile.subscription_status = Some(SubscriptionStatus::Cancelled);
        profile.cancellation_date = Some(Timestamp::now());
        store.seed_profile(profile).await;
    }

    #[tokio::test]
    async fn pending_cancellation_is_resumed() {
        let store = InMemoryStore::new();
        seed_cancelled_profile(&store).await;
        let mut pending = subscription("sub_1", ProviderSubscriptionStatus::Active);
        pending.cancel_at_period_end = true;
        let payments = Arc::new(MockPaymentProvider::new().with_subscription(pending));

        let result = handler(&store, payments.clone())
            .handle(ReactivateSubscriptionCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, ReactivationOutcome::Resumed);
        assert_eq!(
            result.profile.subscription_status,
            Some(SubscriptionStatus::Active)
        );
        assert_eq!(result.profile.cancellation_date, None);
        assert!(!payments.subscription("sub_1").unwrap().cancel_at_period_end);
    }

    #[tokio::test]
    async fn active_without_pending_is_idempotent_success() {
        let store = InMemoryStore::new();
        seed_cancelled_profile(&store).await;
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_subscription(subscription("sub_1", ProviderSubscriptionStatus::Active)),
        );

        let result = handler(&store, payments.clone())
            .handle(ReactivateSubscriptionCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, ReactivationOutcome::AlreadyActive);
        assert_eq!(
            result.profile.subscription_status,
            Some(SubscriptionStatus::Active)
        );
        // Resync only: no resume call was made.
        assert!(!payments.calls().contains(&"resume_subscription".to_string()));
    }

    #[tokio::test]
    async fn fully_terminated_subscription_cannot_be_reactivated() {
        let store = InMemoryStore::new();
        seed_cancelled_profile(&store).await;
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_subscription(subscription("sub_1", ProviderSubscriptionStatus::Canceled)),
        );

        let err = handler(&store, payments)
            .handle(ReactivateSubscriptionCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, BillingError::SubscriptionTerminated);
    }

    #[tokio::test]
    async fn no_subscriptions_at_all_is_denied() {
        let store = InMemoryStore::new();
        seed_cancelled_profile(&store).await;
        let payments = Arc::new(MockPaymentProvider::new());

        let err = handler(&store, payments)
            .handle(ReactivateSubscriptionCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, BillingError::ReactivationDenied);
    }

    #[tokio::test]
    async fn missing_customer_link_is_rejected() {
        let store = InMemoryStore::new();
        store.seed_profile(BillingProfile::new(test_user_id())).await;

        let err = handler(&store, Arc::new(MockPaymentProvider::new()))
            .handle(ReactivateSubscriptionCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::NoPaymentAccount(_)));
    }

    #[tokio::test]
    async fn unknown_price_refuses_to_guess_a_plan() {
        let store = InMemoryStore::new();
        seed_cancelled_profile(&store).await;
        let mut pending = subscription("sub_1", ProviderSubscriptionStatus::Active);
        pending.cancel_at_period_end = true;
        pending.price_id = Some("price_other_env".to_string());
        let payments = Arc::new(MockPaymentProvider::new().with_subscription(pending));

        let err = handler(&store, payments)
            .handle(ReactivateSubscriptionCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::PlanNotIdentified { .. }));
    }
}
