//! Billing profile repository port.
//!
//! The profile is the only shared mutable state in the system, so the
//! write path carries an optimistic-concurrency guard: `update` compares
//! the stored version against the version the caller read and refuses the
//! write if another reconciliation got there first.

use async_trait::async_trait;

use crate::domain::billing::BillingProfile;
use crate::domain::foundation::{DomainError, UserId};

/// Outcome of a guarded profile write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    /// The write landed; the stored version is now `profile.version + 1`.
    Updated,

    /// Someone else wrote first. Re-read and retry.
    StaleVersion,
}

/// Repository port for billing profiles.
#[async_trait]
pub trait BillingProfileRepository: Send + Sync {
    /// Find a user's profile. Returns `None` if the user has no billing
    /// history yet.
    async fn find(&self, user_id: &UserId) -> Result<Option<BillingProfile>, DomainError>;

    /// Find a user's profile, falling back to an empty one (version 0).
    async fn find_or_default(&self, user_id: &UserId) -> Result<BillingProfile, DomainError> {
        Ok(self
            .find(user_id)
            .await?
            .unwrap_or_else(|| BillingProfile::new(user_id.clone())))
    }

    /// Find the profile holding a payment-provider customer id.
    ///
    /// Used by the webhook path, where only the provider's customer id is
    /// known.
    async fn find_by_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<BillingProfile>, DomainError>;

    /// Persist the profile if the stored version still equals
    /// `profile.version`; a version-0 profile with no stored row is
    /// inserted. Never partially writes.
    async fn update(&self, profile: &BillingProfile) -> Result<UpdateResult, DomainError>;

    /// Purge a stale payment-provider customer id.
    ///
    /// The one deliberate destructive correction in the system: used when
    /// the provider reports the customer gone (test/live environment
    /// mismatch). Leaves every other field untouched.
    async fn clear_customer_id(&self, user_id: &UserId) -> Result<(), DomainError>;
}
