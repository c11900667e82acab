//! Plan module - Subscription plans and entitlements.
//!
//! The plan catalog is static configuration: each plan maps to a fixed set
//! of limits. The entitlement evaluator answers "may this actor create
//! another bounded resource" as pure functions that never fail.

mod entitlements;
mod limits;
mod plan_id;
mod pricing;

pub use entitlements::{
    can_add_email_account, can_create_organization, can_use_auto_export, max_invoices,
};
pub use limits::{InvoiceQuota, PlanLimits, PLAN_CATALOG};
pub use plan_id::PlanId;
pub use pricing::PriceTable;
