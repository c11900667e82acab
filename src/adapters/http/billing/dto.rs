//! Request/response DTOs for billing endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::billing::{BillingProfile, SubscriptionStatus};
use crate::domain::foundation::{Timestamp, UsagePeriod};
use crate::domain::plan::{max_invoices, PlanId, PlanLimits, PLAN_CATALOG};

#[derive(Debug, Deserialize, Default)]
pub struct CancelSubscriptionRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionStateResponse {
    pub plan: Option<PlanId>,
    pub status: Option<SubscriptionStatus>,
    pub is_trial: bool,
    pub subscription_ends_at: Option<Timestamp>,
}

impl From<&BillingProfile> for SubscriptionStateResponse {
    fn from(profile: &BillingProfile) -> Self {
        Self {
            plan: profile.selected_plan,
            status: profile.subscription_status,
            is_trial: profile.is_trial,
            subscription_ends_at: profile.subscription_ends_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CancelSubscriptionResponse {
    #[serde(flatten)]
    pub state: SubscriptionStateResponse,
    pub effective_at: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct ReactivateSubscriptionResponse {
    #[serde(flatten)]
    pub state: SubscriptionStateResponse,
    /// "resumed" or "already_active".
    pub outcome: String,
}

#[derive(Debug, Serialize)]
pub struct SyncPlanResponse {
    #[serde(flatten)]
    pub state: SubscriptionStateResponse,
    /// "synced", "expired", or "no_change".
    pub outcome: String,
}

#[derive(Debug, Serialize)]
pub struct EntitlementsResponse {
    pub plan: Option<PlanId>,
    pub status: Option<SubscriptionStatus>,
    pub max_email_accounts: Option<u32>,
    pub max_organizations: Option<u32>,
    pub monthly_invoice_limit: Option<u32>,
    pub auto_export: bool,
    pub period: UsagePeriod,
    pub invoices_used: u32,
}

impl EntitlementsResponse {
    pub fn from_profile(profile: &BillingProfile) -> Self {
        let limits = profile.selected_plan.map(PlanLimits::for_plan);
        let period = UsagePeriod::current();

        Self {
            plan: profile.selected_plan,
            status: profile.subscription_status,
            max_email_accounts: limits.as_ref().map_or(Some(1), |l| l.max_email_accounts),
            max_organizations: limits.as_ref().map_or(Some(0), |l| l.max_organizations),
            monthly_invoice_limit: max_invoices(profile.selected_plan).limit(),
            auto_export: limits.as_ref().is_some_and(|l| l.auto_export),
            invoices_used: profile.invoices_used(&period),
            period,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceUsageResponse {
    pub period: UsagePeriod,
    pub used: u32,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PlanCatalogEntry {
    pub plan: PlanId,
    pub max_email_accounts: Option<u32>,
    pub max_organizations: Option<u32>,
    pub monthly_invoice_limit: Option<u32>,
    pub auto_export: bool,
}

impl PlanCatalogEntry {
    /// The catalog shown on the pricing page.
    pub fn catalog() -> Vec<Self> {
        PLAN_CATALOG
            .iter()
            .map(|limits| Self {
                plan: limits.plan,
                max_email_accounts: limits.max_email_accounts,
                max_organizations: limits.max_organizations,
                monthly_invoice_limit: limits.invoice_quota.limit(),
                auto_export: limits.auto_export,
            })
            .collect()
    }
}
