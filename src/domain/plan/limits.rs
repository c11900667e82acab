//! Plan-based resource limits configuration.
//!
//! Defines what a user can create based on their subscription plan. Limits
//! always count active resources only; deactivated resources do not consume
//! quota.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::PlanId;

/// The full plan catalog, cheapest tier first.
pub static PLAN_CATALOG: Lazy<Vec<PlanLimits>> = Lazy::new(|| {
    [
        PlanId::Starter,
        PlanId::Pro,
        PlanId::Business,
        PlanId::Enterprise,
    ]
    .into_iter()
    .map(PlanLimits::for_plan)
    .collect()
});

/// Monthly invoice quota for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceQuota {
    /// Up to this many invoices per calendar month.
    Limited(u32),
    /// No monthly cap.
    Unlimited,
}

impl InvoiceQuota {
    /// True if `used` invoices this month still leaves room for one more.
    pub fn allows(&self, used: u32) -> bool {
        match self {
            InvoiceQuota::Limited(max) => used < *max,
            InvoiceQuota::Unlimited => true,
        }
    }

    /// The numeric cap, if any.
    pub fn limit(&self) -> Option<u32> {
        match self {
            InvoiceQuota::Limited(max) => Some(*max),
            InvoiceQuota::Unlimited => None,
        }
    }
}

/// Resource limits for a subscription plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    /// The plan these limits apply to.
    pub plan: PlanId,
    /// Maximum connected email accounts. None = unlimited.
    pub max_email_accounts: Option<u32>,
    /// Maximum organizations the user may own. None = unlimited.
    pub max_organizations: Option<u32>,
    /// Monthly invoice quota.
    pub invoice_quota: InvoiceQuota,
    /// Whether automatic export of extracted invoices is enabled.
    pub auto_export: bool,
}

impl PlanLimits {
    /// Get the limits for a specific plan.
    ///
    /// # Plan Configuration
    ///
    /// | Plan | Email accounts | Organizations | Invoices/month | Auto-export |
    /// |------|----------------|---------------|----------------|-------------|
    /// | Starter | 1 | 0 | 50 | No |
    /// | Pro | 3 | 1 | 300 | Yes |
    /// | Business | 10 | 5 | 1000 | Yes |
    /// | Enterprise | Unlimited | Unlimited | Unlimited | Yes |
    pub fn for_plan(plan: PlanId) -> Self {
        match plan {
            PlanId::Starter => Self {
                plan,
                max_email_accounts: Some(1),
                max_organizations: Some(0),
                invoice_quota: InvoiceQuota::Limited(50),
                auto_export: false,
            },
            PlanId::Pro => Self {
                plan,
                max_email_accounts: Some(3),
                max_organizations: Some(1),
                invoice_quota: InvoiceQuota::Limited(300),
                auto_export: true,
            },
            PlanId::Business => Self {
                plan,
                max_email_accounts: Some(10),
                max_organizations: Some(5),
                invoice_quota: InvoiceQuota::Limited(1000),
                auto_export: true,
            },
            PlanId::Enterprise => Self {
                plan,
                max_email_accounts: None,
                max_organizations: None,
                invoice_quota: InvoiceQuota::Unlimited,
                auto_export: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_allows_one_email_account() {
        let limits = PlanLimits::for_plan(PlanId::Starter);
        assert_eq!(limits.max_email_accounts, Some(1));
    }

    #[test]
    fn starter_allows_no_organizations() {
        let limits = PlanLimits::for_plan(PlanId::Starter);
        assert_eq!(limits.max_organizations, Some(0));
    }

    #[test]
    fn starter_has_no_auto_export() {
        assert!(!PlanLimits::for_plan(PlanId::Starter).auto_export);
    }

    #[test]
    fn pro_allows_one_organization() {
        let limits = PlanLimits::for_plan(PlanId::Pro);
        assert_eq!(limits.max_organizations, Some(1));
        assert!(limits.auto_export);
    }

    #[test]
    fn business_allows_ten_email_accounts() {
        let limits = PlanLimits::for_plan(PlanId::Business);
        assert_eq!(limits.max_email_accounts, Some(10));
        assert_eq!(limits.max_organizations, Some(5));
    }

    #[test]
    fn enterprise_is_unlimited() {
        let limits = PlanLimits::for_plan(PlanId::Enterprise);
        assert_eq!(limits.max_email_accounts, None);
        assert_eq!(limits.max_organizations, None);
        assert_eq!(limits.invoice_quota, InvoiceQuota::Unlimited);
    }

    #[test]
    fn invoice_quota_boundary_is_strict_less_than() {
        let quota = InvoiceQuota::Limited(50);
        assert!(quota.allows(49));
        assert!(!quota.allows(50));
        assert!(!quota.allows(51));
    }

    #[test]
    fn unlimited_quota_always_allows() {
        assert!(InvoiceQuota::Unlimited.allows(u32::MAX));
    }

    #[test]
    fn quota_limit_exposes_cap() {
        assert_eq!(InvoiceQuota::Limited(300).limit(), Some(300));
        assert_eq!(InvoiceQuota::Unlimited.limit(), None);
    }

    #[test]
    fn catalog_lists_all_plans_cheapest_first() {
        assert_eq!(PLAN_CATALOG.len(), 4);
        assert_eq!(PLAN_CATALOG[0].plan, PlanId::Starter);
        assert_eq!(PLAN_CATALOG[3].plan, PlanId::Enterprise);
        for pair in PLAN_CATALOG.windows(2) {
            assert!(pair[0].plan.rank() < pair[1].plan.rank());
        }
    }
}
