//! Billing profile - typed projection of subscription state.
//!
//! The source system kept these fields in an untyped user-metadata map;
//! here they are an explicit record validated at the reconciliation
//! boundary. The profile is the only shared mutable state in the system
//! and every write goes through a version-guarded repository update.
//!
//! # Invariants
//!
//! - One profile per user.
//! - `version` increments on every persisted write; a stale writer loses.
//! - Reconciliation overwrites projection fields wholesale; it never
//!   merges field-by-field with what the provider reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UsagePeriod, UserId};
use crate::domain::plan::PlanId;

use super::{SubscriptionProjection, SubscriptionStatus};

/// Cached billing state for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingProfile {
    /// Owning user.
    pub user_id: UserId,

    /// Plan derived from the provider subscription, if any.
    pub selected_plan: Option<PlanId>,

    /// Cached subscription status. None = no plan ever selected.
    pub subscription_status: Option<SubscriptionStatus>,

    /// Payment provider customer id.
    pub stripe_customer_id: Option<String>,

    /// Payment provider subscription id.
    pub stripe_subscription_id: Option<String>,

    /// Whether the user is currently in a trial period.
    pub is_trial: bool,

    /// When the trial started.
    pub trial_started_at: Option<Timestamp>,

    /// When the trial ends or ended.
    pub trial_ends_at: Option<Timestamp>,

    /// A user gets one trial; set once it has been used up.
    pub trial_consumed: bool,

    /// When the user requested cancellation.
    pub cancellation_date: Option<Timestamp>,

    /// When access actually ends (period end for cancelled subscriptions).
    pub subscription_ends_at: Option<Timestamp>,

    /// Invoice counts per calendar month.
    pub usage: BTreeMap<UsagePeriod, u32>,

    /// Optimistic-concurrency guard, incremented on every persisted write.
    pub version: i64,

    /// When the profile was last written.
    pub updated_at: Timestamp,
}

impl BillingProfile {
    /// Fresh profile for a user with no billing history.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            selected_plan: None,
            subscription_status: None,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            is_trial: false,
            trial_started_at: None,
            trial_ends_at: None,
            trial_consumed: false,
            cancellation_date: None,
            subscription_ends_at: None,
            usage: BTreeMap::new(),
            version: 0,
            updated_at: Timestamp::now(),
        }
    }

    /// True if a payment-provider customer is linked.
    pub fn has_payment_account(&self) -> bool {
        self.stripe_customer_id.is_some()
    }

    /// True if cancellation is already scheduled or done.
    pub fn is_cancelled(&self) -> bool {
        self.subscription_status == Some(SubscriptionStatus::Cancelled)
    }

    /// Cancel a trial that has no payment-provider backing.
    ///
    /// Handled purely locally: no provider call exists to make. Access ends
    /// when the trial would have ended, or immediately if no end was set.
    pub fn cancel_trial_locally(&mut self, now: Timestamp) {
        self.subscription_status = Some(SubscriptionStatus::Cancelled);
        self.subscription_ends_at = Some(self.trial_ends_at.unwrap_or(now));
        self.cancellation_date = Some(now);
        self.is_trial = false;
        self.trial_consumed = true;
        self.updated_at = now;
    }

    /// Overwrite projection fields from reconciled provider truth.
    pub fn apply(&mut self, projection: &SubscriptionProjection, now: Timestamp) {
        self.selected_plan = Some(projection.plan);
        self.subscription_status = Some(projection.status);
        self.stripe_subscription_id = Some(projection.subscription_id.clone());
        self.is_trial = projection.is_trial;
        self.trial_started_at = projection.trial_started_at;
        self.trial_ends_at = projection.trial_ends_at;
        if projection.is_trial {
            self.trial_consumed = true;
        }
        self.subscription_ends_at = projection.subscription_ends_at;
        if projection.status != SubscriptionStatus::Cancelled {
            self.cancellation_date = None;
        }
        self.updated_at = now;
    }

    /// Record a provider-confirmed cancellation scheduled for period end.
    pub fn mark_cancelled(
        &mut self,
        subscription_id: String,
        ends_at: Timestamp,
        now: Timestamp,
    ) {
        self.subscription_status = Some(SubscriptionStatus::Cancelled);
        self.stripe_subscription_id = Some(subscription_id);
        self.subscription_ends_at = Some(ends_at);
        self.cancellation_date = Some(now);
        self.updated_at = now;
    }

    /// Demote the cache when the provider no longer reports a live
    /// subscription.
    pub fn mark_expired(&mut self, now: Timestamp) {
        self.subscription_status = Some(SubscriptionStatus::Expired);
        self.stripe_subscription_id = None;
        self.is_trial = false;
        self.updated_at = now;
    }

    /// Invoices recorded for the given period.
    pub fn invoices_used(&self, period: &UsagePeriod) -> u32 {
        self.usage.get(period).copied().unwrap_or(0)
    }

    /// Record one extracted invoice against the given period.
    pub fn record_invoice(&mut self, period: UsagePeriod, now: Timestamp) {
        *self.usage.entry(period).or_insert(0) += 1;
        self.updated_at = now;
    }

    /// True if the cached state grants access right now.
    pub fn has_access(&self, now: Timestamp) -> bool {
        let Some(status) = self.subscription_status else {
            return false;
        };
        if !status.has_access() {
            return false;
        }
        // Cancelled keeps access only until the recorded end.
        if status == SubscriptionStatus::Cancelled {
            return match self.subscription_ends_at {
                Some(ends_at) => now <= ends_at,
                None => false,
            };
        }
        true
    }
}
