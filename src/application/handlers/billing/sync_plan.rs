//! SyncPlanHandler - Pull reconciliation from the payment provider.
//!
//! The provider is the source of truth; this handler projects its current
//! record into the cached billing profile. Repeating a sync against
//! unchanged provider state yields the same cached output.
//!
//! One deliberate destructive correction: a customer id the provider no
//! longer knows (test id against live keys, or vice versa) is purged from
//! the cache so the account can be relinked.

use std::sync::Arc;

use crate::application::single_flight::KeyedLock;
use crate::domain::billing::{project, select_for_sync, BillingError, BillingProfile, SubscriptionStatus};
use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::plan::PriceTable;
use crate::ports::{BillingProfileRepository, PaymentProvider, UpdateResult};

/// Command to reconcile the cached plan with the provider.
#[derive(Debug, Clone)]
pub struct SyncPlanCommand {
    pub user_id: UserId,
}

/// How the sync concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A live subscription was projected into the cache.
    Synced,

    /// The provider reports no live subscription; the cache was demoted.
    Expired,

    /// Nothing live at the provider and nothing live cached; no change.
    NoChange,
}

/// Result of a successful sync.
#[derive(Debug, Clone)]
pub struct SyncPlanResult {
    pub profile: BillingProfile,
    pub outcome: SyncOutcome,
}

/// Handler for pull reconciliation.
pub struct SyncPlanHandler {
    profiles: Arc<dyn BillingProfileRepository>,
    payments: Arc<dyn PaymentProvider>,
    prices: Arc<PriceTable>,
    locks: Arc<KeyedLock>,
}

impl SyncPlanHandler {
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

    pub async fn handle(&self, cmd: SyncPlanCommand) -> Result<SyncPlanResult, BillingError> {
        let _guard = self.locks.acquire(cmd.user_id.as_str()).await;

        let mut profile = self.profiles.find_or_default(&cmd.user_id).await?;
        let customer_id = profile
            .stripe_customer_id
            .clone()
            .ok_or_else(|| BillingError::no_payment_account(cmd.user_id.clone()))?;

        // Environment-mismatch guard: a vanished customer means the cached
        // id is from another environment. Purge it, nothing else.
        if self.payments.get_customer(&customer_id).await?.is_none() {
            self.profiles.clear_customer_id(&cmd.user_id).await?;
            tracing::warn!(
                user_id = %cmd.user_id,
                customer_id = %customer_id,
                "stale payment customer id purged"
            );
            return Err(BillingError::customer_not_found(customer_id));
        }

        let subscriptions = self.payments.list_subscriptions(&customer_id).await?;
        let now = Timestamp::now();

        match select_for_sync(&subscriptions) {
            Some(current) => {
                let projection = project(current, &self.prices)?;
                profile.apply(&projection, now);
                self.persist(&profile).await?;

                tracing::debug!(user_id = %cmd.user_id, plan = %projection.plan, "plan synced");
                Ok(SyncPlanResult {
                    profile,
                    outcome: SyncOutcome::Synced,
                })
            }

            None => {
                let cache_claims_live = matches!(
                    profile.subscription_status,
                    Some(SubscriptionStatus::Active) | Some(SubscriptionStatus::Trialing)
                );

                if cache_claims_live {
                    profile.mark_expired(now);
                    self.persist(&profile).await?;
                    tracing::info!(user_id = %cmd.user_id, "no live subscription; cache demoted");
                    Ok(SyncPlanResult {
                        profile,
                        outcome: SyncOutcome::Expired,
                    })
                } else {
                    Ok(SyncPlanResult {
                        profile,
                        outcome: SyncOutcome::NoChange,
                    })
                }
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
    use crate::domain::plan::PlanId;
    use crate::ports::{ProviderSubscription, ProviderSubscriptionStatus};

    fn test_user_id() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn prices() -> Arc<PriceTable> {
        Arc::new(PriceTable::from_pairs([
            ("price_pro_monthly", PlanId::Pro),
            ("price_business_monthly", PlanId::Business),
        ]))
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

    fn handler(store: &InMemoryStore, payments: Arc<MockPaymentProvider>) -> SyncPlanHandler {
        SyncPlanHandler::new(
            Arc::new(store.clone()),
            payments,
            prices(),
            Arc::new(KeyedLock::new()),
        )
    }

    async fn seed_linked_profile(store: &InMemoryStore) {
        let mut profile = BillingProfile::new(test_user_id());
        profile.stripe_customer_id = Some("cus_1".to_string());
        store.seed_profile(profile).await;
    }

    #[tokio::test]
    async fn active_subscription_syncs_plan_and_status() {
        let store = InMemoryStore::new();
        seed_linked_profile(&store).await;
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_customer("cus_1")
                .with_subscription(subscription("sub_1", ProviderSubscriptionStatus::Active)),
        );

        let result = handler(&store, payments)
            .handle(SyncPlanCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, SyncOutcome::Synced);
        assert_eq!(result.profile.selected_plan, Some(PlanId::Pro));
        assert_eq!(
            result.profile.subscription_status,
            Some(SubscriptionStatus::Active)
        );
    }

    #[tokio::test]
    async fn sync_is_idempotent_against_unchanged_provider_state() {
        let store = InMemoryStore::new();
        seed_linked_profile(&store).await;
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_customer("cus_1")
                .with_subscription(subscription("sub_1", ProviderSubscriptionStatus::Active)),
        );
        let handler = handler(&store, payments);

        let first = handler
            .handle(SyncPlanCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap();
        let second = handler
            .handle(SyncPlanCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap();

        // Identical cached output apart from the bookkeeping columns.
        let mut a = first.profile.clone();
        let mut b = second.profile.clone();
        a.version = 0;
        b.version = 0;
        a.updated_at = b.updated_at;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn cancel_at_period_end_overrides_active_status() {
        let store = InMemoryStore::new();
        seed_linked_profile(&store).await;
        let mut pending = subscription("sub_1", ProviderSubscriptionStatus::Active);
        pending.cancel_at_period_end = true;
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_customer("cus_1")
                .with_subscription(pending),
        );

        let result = handler(&store, payments)
            .handle(SyncPlanCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap();

        assert_eq!(
            result.profile.subscription_status,
            Some(SubscriptionStatus::Cancelled)
        );
        assert_eq!(
            result.profile.subscription_ends_at,
            Some(Timestamp::from_unix_secs(1_702_592_000))
        );
    }

    #[tokio::test]
    async fn trialing_subscription_derives_trial_fields() {
        let store = InMemoryStore::new();
        seed_linked_profile(&store).await;
        let mut trialing = subscription("sub_1", ProviderSubscriptionStatus::Trialing);
        trialing.trial_start = Some(1_700_000_000);
        trialing.trial_end = Some(1_701_209_600);
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_customer("cus_1")
                .with_subscription(trialing),
        );

        let result = handler(&store, payments)
            .handle(SyncPlanCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap();

        assert!(result.profile.is_trial);
        assert_eq!(
            result.profile.trial_ends_at,
            Some(Timestamp::from_unix_secs(1_701_209_600))
        );
    }

    #[tokio::test]
    async fn vanished_customer_purges_only_the_customer_id() {
        let store = InMemoryStore::new();
        let mut profile = BillingProfile::new(test_user_id());
        profile.stripe_customer_id = Some("cus_stale".to_string());
        profile.selected_plan = Some(PlanId::Pro);
        profile.subscription_status = Some(SubscriptionStatus::Active);
        store.seed_profile(profile).await;
        // Customer not registered with the provider.
        let payments = Arc::new(MockPaymentProvider::new());

        let err = handler(&store, payments)
            .handle(SyncPlanCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::CustomerNotFound { .. }));
        let stored = store.stored_profile(&test_user_id()).unwrap();
        assert_eq!(stored.stripe_customer_id, None);
        // The rest of the cache survives the correction.
        assert_eq!(stored.selected_plan, Some(PlanId::Pro));
        assert_eq!(stored.subscription_status, Some(SubscriptionStatus::Active));
    }

    #[tokio::test]
    async fn unknown_price_is_an_explicit_error_not_a_default() {
        let store = InMemoryStore::new();
        seed_linked_profile(&store).await;
        let mut sub = subscription("sub_1", ProviderSubscriptionStatus::Active);
        sub.price_id = Some("price_live_mystery".to_string());
        let payments = Arc::new(
            MockPaymentProvider::new()
                .with_customer("cus_1")
                .with_subscription(sub),
        );

        let err = handler(&store, payments)
            .handle(SyncPlanCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::PlanNotIdentified { .. }));
        // Failed reconciliation must not corrupt the cache.
        let stored = store.stored_profile(&test_user_id()).unwrap();
        assert_eq!(stored.selected_plan, None);
    }

    #[tokio::test]
    async fn live_cache_with_no_provider_subscription_demotes_to_expired() {
        let store = InMemoryStore::new();
        let mut profile = BillingProfile::new(test_user_id());
        profile.stripe_customer_id = Some("cus_1".to_string());
        profile.subscription_status = Some(SubscriptionStatus::Active);
        profile.stripe_subscription_id = Some("sub_gone".to_string());
        store.seed_profile(profile).await;
        let payments = Arc::new(MockPaymentProvider::new().with_customer("cus_1"));

        let result = handler(&store, payments)
            .handle(SyncPlanCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, SyncOutcome::Expired);
        assert_eq!(
            result.profile.subscription_status,
            Some(SubscriptionStatus::Expired)
        );
        assert_eq!(result.profile.stripe_subscription_id, None);
    }

    #[tokio::test]
    async fn dormant_cache_with_no_subscription_is_untouched() {
        let store = InMemoryStore::new();
        seed_linked_profile(&store).await;
        let payments = Arc::new(MockPaymentProvider::new().with_customer("cus_1"));

        let result = handler(&store, payments)
            .handle(SyncPlanCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap();

        assert_eq!(result.outcome, SyncOutcome::NoChange);
        assert_eq!(result.profile.subscription_status, None);
    }

    #[tokio::test]
    async fn missing_customer_link_is_rejected() {
        let store = InMemoryStore::new();
        store.seed_profile(BillingProfile::new(test_user_id())).await;

        let err = handler(&store, Arc::new(MockPaymentProvider::new()))
            .handle(SyncPlanCommand {
                user_id: test_user_id(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::NoPaymentAccount(_)));
    }
}
