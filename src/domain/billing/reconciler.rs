//! Pure reconciliation rules.
//!
//! Selection picks which provider subscription an operation acts on;
//! projection turns that subscription into the fields the cache stores.
//! Both are pure functions so a repeated sync against unchanged provider
//! state always produces the same cached output.
//!
//! When several subscriptions qualify for an operation the newest one (by
//! provider creation time) wins. Accounts should not be in that state; the
//! selection is logged so it can be reconciled manually.

use crate::domain::plan::{PlanId, PriceTable};
use crate::ports::{ProviderSubscription, ProviderSubscriptionStatus};

use super::{BillingError, SubscriptionStatus};
use crate::domain::foundation::Timestamp;

/// Cached fields derived from one provider subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionProjection {
    pub plan: PlanId,
    pub status: SubscriptionStatus,
    pub subscription_id: String,
    pub is_trial: bool,
    pub trial_started_at: Option<Timestamp>,
    pub trial_ends_at: Option<Timestamp>,
    pub subscription_ends_at: Option<Timestamp>,
}

/// Outcome of looking for something to reactivate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reactivatable<'a> {
    /// A subscription has cancellation pending; clear the flag.
    Resume(&'a ProviderSubscription),

    /// A live subscription exists with nothing pending; resync and report
    /// success (idempotent).
    AlreadyActive(&'a ProviderSubscription),

    /// Only fully-terminated subscriptions exist; a new checkout is needed.
    Terminated,

    /// Nothing to reactivate at all.
    Nothing,
}

fn is_live(status: ProviderSubscriptionStatus) -> bool {
    matches!(
        status,
        ProviderSubscriptionStatus::Trialing
            | ProviderSubscriptionStatus::Active
            | ProviderSubscriptionStatus::PastDue
            | ProviderSubscriptionStatus::Unpaid
    )
}

fn newest<'a, I>(subs: I) -> Option<&'a ProviderSubscription>
where
    I: Iterator<Item = &'a ProviderSubscription>,
{
    subs.max_by_key(|s| s.created)
}

/// The subscription a cancellation request acts on.
///
/// Any status that still represents a billing relationship qualifies:
/// trialing, active, past_due, unpaid.
pub fn select_cancellable(subs: &[ProviderSubscription]) -> Option<&ProviderSubscription> {
    let qualifying: Vec<&ProviderSubscription> =
        subs.iter().filter(|s| is_live(s.status)).collect();

    if qualifying.len() > 1 {
        tracing::warn!(
            count = qualifying.len(),
            "multiple live subscriptions for customer; taking newest"
        );
    }

    newest(qualifying.into_iter())
}

/// The subscription a pull-sync projects from: active or trialing only.
pub fn select_for_sync(subs: &[ProviderSubscription]) -> Option<&ProviderSubscription> {
    let qualifying: Vec<&ProviderSubscription> = subs
        .iter()
        .filter(|s| {
            matches!(
                s.status,
                ProviderSubscriptionStatus::Active | ProviderSubscriptionStatus::Trialing
            )
        })
        .collect();

    if qualifying.len() > 1 {
        tracing::warn!(
            count = qualifying.len(),
            "multiple active subscriptions for customer; taking newest"
        );
    }

    newest(qualifying.into_iter())
}

/// Decide what a reactivation request can act on.
pub fn find_reactivatable(subs: &[ProviderSubscription]) -> Reactivatable<'_> {
    if let Some(pending) = newest(
        subs.iter()
            .filter(|s| s.cancel_at_period_end && is_live(s.status)),
    ) {
        return Reactivatable::Resume(pending);
    }

    if let Some(live) = newest(subs.iter().filter(|s| is_live(s.status))) {
        return Reactivatable::AlreadyActive(live);
    }

    if subs
        .iter()
        .any(|s| s.status == ProviderSubscriptionStatus::Canceled)
    {
        return Reactivatable::Terminated;
    }

    Reactivatable::Nothing
}

/// Project one provider subscription into cacheable fields.
///
/// A scheduled cancellation overrides the raw provider status: the cache
/// stores `cancelled` with `subscription_ends_at` set to the period end,
/// regardless of the provider reporting `active` until then.
///
/// # Errors
///
/// `PlanNotIdentified` when the price id is missing or unmapped. The
/// reconciler refuses to guess a plan.
pub fn project(
    sub: &ProviderSubscription,
    prices: &PriceTable,
) -> Result<SubscriptionProjection, BillingError> {
    let price_id = sub
        .price_id
        .as_deref()
        .ok_or_else(|| BillingError::plan_not_identified("<missing>"))?;

    let plan = prices
        .resolve(price_id)
        .ok_or_else(|| BillingError::plan_not_identified(price_id))?;

    let base_status = match sub.status {
        ProviderSubscriptionStatus::Trialing => SubscriptionStatus::Trialing,
        ProviderSubscriptionStatus::Active => SubscriptionStatus::Active,
        ProviderSubscriptionStatus::PastDue | ProviderSubscriptionStatus::Unpaid => {
            SubscriptionStatus::PastDue
        }
        ProviderSubscriptionStatus::Canceled
        | ProviderSubscriptionStatus::Incomplete
        | ProviderSubscriptionStatus::IncompleteExpired
        | ProviderSubscriptionStatus::Paused
        | ProviderSubscriptionStatus::Unknown => SubscriptionStatus::Expired,
    };

    let period_end = Timestamp::from_unix_secs(sub.current_period_end);

    let (status, subscription_ends_at) = if sub.cancel_at_period_end && is_live(sub.status) {
        (SubscriptionStatus::Cancelled, Some(period_end))
    } else if base_status == SubscriptionStatus::Expired {
        (SubscriptionStatus::Expired, Some(period_end))
    } else {
        (base_status, None)
    };

    Ok(SubscriptionProjection {
        plan,
        status,
        subscription_id: sub.id.clone(),
        is_trial: sub.status == ProviderSubscriptionStatus::Trialing,
        trial_started_at: sub.trial_start.map(Timestamp::from_unix_secs),
        trial_ends_at: sub.trial_end.map(Timestamp::from_unix_secs),
        subscription_ends_at,
    })
}
