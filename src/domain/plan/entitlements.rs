//! Pure entitlement checks.
//!
//! These functions never fail; they answer yes/no (or return a quota) from
//! the plan catalog and a current usage count. Callers translate a denial
//! into a quota error carrying the count and limit.
//!
//! All comparisons are strict less-than: a limit of N means at most N
//! resources may exist, so creating one more requires `count < N`. Only
//! active resources count against a limit.

use super::{InvoiceQuota, PlanId, PlanLimits};

/// Fallback limit applied when the user has no recognizable plan.
///
/// Matches the most restrictive tier (starter: one account) so an absent or
/// unknown plan can never unlock more than the lowest tier would.
const DEFAULT_EMAIL_ACCOUNT_LIMIT: u32 = 1;

/// May the user connect another email account?
///
/// An unknown/absent plan falls back to [`DEFAULT_EMAIL_ACCOUNT_LIMIT`].
pub fn can_add_email_account(plan: Option<PlanId>, active_count: u32) -> bool {
    let limit = plan
        .map(|p| PlanLimits::for_plan(p).max_email_accounts)
        .unwrap_or(Some(DEFAULT_EMAIL_ACCOUNT_LIMIT));

    match limit {
        Some(max) => active_count < max,
        None => true,
    }
}

/// May the user create another organization?
///
/// A user without an active plan may never create an organization.
pub fn can_create_organization(plan: Option<PlanId>, org_count: u32) -> bool {
    let Some(plan) = plan else {
        return false;
    };

    match PlanLimits::for_plan(plan).max_organizations {
        Some(max) => org_count < max,
        None => true,
    }
}

/// Is automatic invoice export available on this plan?
pub fn can_use_auto_export(plan: Option<PlanId>) -> bool {
    plan.map(|p| PlanLimits::for_plan(p).auto_export)
        .unwrap_or(false)
}

/// Monthly invoice quota for the plan.
///
/// An absent plan gets the starter quota, never unlimited.
pub fn max_invoices(plan: Option<PlanId>) -> InvoiceQuota {
    PlanLimits::for_plan(plan.unwrap_or(PlanId::Starter)).invoice_quota
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Email account entitlement

    #[test]
    fn starter_with_one_active_account_is_denied() {
        assert!(!can_add_email_account(Some(PlanId::Starter), 1));
    }

    #[test]
    fn starter_with_zero_accounts_is_allowed() {
        assert!(can_add_email_account(Some(PlanId::Starter), 0));
    }

    #[test]
    fn absent_plan_gets_the_starter_limit() {
        assert!(can_add_email_account(None, 0));
        assert!(!can_add_email_account(None, 1));
        assert!(!can_add_email_account(None, 100));
    }

    #[test]
    fn enterprise_accounts_are_unlimited() {
        assert!(can_add_email_account(Some(PlanId::Enterprise), 10_000));
    }

    #[test]
    fn boundary_is_strict_less_than() {
        // Pro allows 3 accounts: the 3rd creation happens at count 2.
        assert!(can_add_email_account(Some(PlanId::Pro), 2));
        assert!(!can_add_email_account(Some(PlanId::Pro), 3));
    }

    // Organization entitlement

    #[test]
    fn absent_plan_never_creates_organizations() {
        assert!(!can_create_organization(None, 0));
        assert!(!can_create_organization(None, 5));
    }

    #[test]
    fn starter_cannot_create_organizations() {
        assert!(!can_create_organization(Some(PlanId::Starter), 0));
    }

    #[test]
    fn pro_can_create_first_organization_only() {
        assert!(can_create_organization(Some(PlanId::Pro), 0));
        assert!(!can_create_organization(Some(PlanId::Pro), 1));
    }

    #[test]
    fn enterprise_organizations_are_unlimited() {
        assert!(can_create_organization(Some(PlanId::Enterprise), 500));
    }

    // Auto export

    #[test]
    fn auto_export_follows_the_catalog() {
        assert!(!can_use_auto_export(Some(PlanId::Starter)));
        assert!(can_use_auto_export(Some(PlanId::Pro)));
        assert!(can_use_auto_export(Some(PlanId::Business)));
        assert!(can_use_auto_export(Some(PlanId::Enterprise)));
    }

    #[test]
    fn auto_export_denied_without_plan() {
        assert!(!can_use_auto_export(None));
    }

    // Invoice quota

    #[test]
    fn enterprise_invoices_are_unlimited() {
        assert_eq!(max_invoices(Some(PlanId::Enterprise)), InvoiceQuota::Unlimited);
    }

    #[test]
    fn absent_plan_gets_the_starter_quota() {
        assert_eq!(max_invoices(None), max_invoices(Some(PlanId::Starter)));
    }

    // Properties

    proptest! {
        /// Allowing is monotonically non-increasing in the usage count.
        #[test]
        fn email_account_allowance_never_increases_with_count(count in 0u32..10_000) {
            for plan in [None, Some(PlanId::Starter), Some(PlanId::Pro), Some(PlanId::Business), Some(PlanId::Enterprise)] {
                if !can_add_email_account(plan, count) {
                    prop_assert!(!can_add_email_account(plan, count + 1));
                }
            }
        }

        /// The allow decision is exactly `count < limit` for limited plans.
        #[test]
        fn email_account_allowance_matches_limit(count in 0u32..100) {
            for plan in [PlanId::Starter, PlanId::Pro, PlanId::Business] {
                let limit = PlanLimits::for_plan(plan).max_email_accounts.unwrap();
                prop_assert_eq!(can_add_email_account(Some(plan), count), count < limit);
            }
        }

        /// No plan means no organizations, for any count.
        #[test]
        fn no_plan_never_creates_organizations(count in 0u32..10_000) {
            prop_assert!(!can_create_organization(None, count));
        }
    }
}
