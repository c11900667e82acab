//! Cached subscription status state machine.
//!
//! This is the *local* view of the subscription lifecycle; the payment
//! provider's record is authoritative and reconciliation may overwrite the
//! cached value wholesale. The state machine governs user-driven
//! transitions (cancel, reactivate) so they fail fast on nonsense requests
//! before any provider call is made.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Cached subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Trial period, paid or unpaid.
    Trialing,

    /// Paid subscription in good standing.
    Active,

    /// Payment failed, retries in progress. Access retained.
    PastDue,

    /// Cancellation scheduled for period end. Access retained until then.
    Cancelled,

    /// Subscription ended. No access; a new checkout is required.
    Expired,
}

impl SubscriptionStatus {
    /// Returns true if this status grants access to the application.
    ///
    /// Cancelled keeps access until the period actually ends; callers that
    /// know the period end should additionally compare it against now.
    pub fn has_access(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Trialing
                | SubscriptionStatus::Active
                | SubscriptionStatus::PastDue
                | SubscriptionStatus::Cancelled
        )
    }

    /// Lowercase storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
        }
    }

    /// Parses the lowercase storage form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trialing" => Some(SubscriptionStatus::Trialing),
            "active" => Some(SubscriptionStatus::Active),
            "past_due" => Some(SubscriptionStatus::PastDue),
            "cancelled" => Some(SubscriptionStatus::Cancelled),
            "expired" => Some(SubscriptionStatus::Expired),
            _ => None,
        }
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // From TRIALING
            (Trialing, Active)
                | (Trialing, PastDue)
                | (Trialing, Cancelled)
                | (Trialing, Expired)
            // From ACTIVE
                | (Active, Active) // Renewal / resync
                | (Active, PastDue)
                | (Active, Cancelled)
                | (Active, Expired)
            // From PAST_DUE
                | (PastDue, Active)
                | (PastDue, Cancelled)
                | (PastDue, Expired)
            // From CANCELLED
                | (Cancelled, Active) // Reactivation
                | (Cancelled, Expired)
            // From EXPIRED
                | (Expired, Trialing) // New checkout
                | (Expired, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Trialing => vec![Active, PastDue, Cancelled, Expired],
            Active => vec![Active, PastDue, Cancelled, Expired],
            PastDue => vec![Active, Cancelled, Expired],
            Cancelled => vec![Active, Expired],
            Expired => vec![Trialing, Active],
        }
    }
}
