//! Billing command handlers.

mod cancel_subscription;
mod reactivate_subscription;
mod record_invoice_usage;
mod sync_plan;

pub use cancel_subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
};
pub use reactivate_subscription::{
    ReactivateSubscriptionCommand, ReactivateSubscriptionHandler, ReactivateSubscriptionResult,
    ReactivationOutcome,
};
pub use record_invoice_usage::{
    RecordInvoiceUsageCommand, RecordInvoiceUsageHandler, RecordInvoiceUsageResult,
};
pub use sync_plan::{SyncOutcome, SyncPlanCommand, SyncPlanHandler, SyncPlanResult};
