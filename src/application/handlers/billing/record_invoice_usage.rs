//! RecordInvoiceUsageHandler - Consume monthly invoice quota.
//!
//! Each successfully extracted invoice consumes one unit of the plan's
//! monthly quota. The check-and-increment runs under the per-user lock so
//! two extractions cannot both squeeze through the last quota slot.

use std::sync::Arc;

use crate::application::single_flight::KeyedLock;
use crate::domain::billing::{BillingError, BillingProfile};
use crate::domain::foundation::{Timestamp, UsagePeriod, UserId};
use crate::domain::plan::max_invoices;
use crate::ports::{BillingProfileRepository, UpdateResult};

/// Command to record one extracted invoice.
#[derive(Debug, Clone)]
pub struct RecordInvoiceUsageCommand {
    pub user_id: UserId,
}

/// Result of a successful usage record.
#[derive(Debug, Clone)]
pub struct RecordInvoiceUsageResult {
    pub profile: BillingProfile,
    pub period: UsagePeriod,
    /// Invoices used this period, including this one.
    pub used: u32,
    /// The plan's monthly cap, if any.
    pub limit: Option<u32>,
}

/// Handler for invoice usage accounting.
pub struct RecordInvoiceUsageHandler {
    profiles: Arc<dyn BillingProfileRepository>,
    locks: Arc<KeyedLock>,
}

impl RecordInvoiceUsageHandler {
    pub fn new(profiles: Arc<dyn BillingProfileRepository>, locks: Arc<KeyedLock>) -> Self {
        Self { profiles, locks }
    }

    pub async fn handle(
        &self,
        cmd: RecordInvoiceUsageCommand,
    ) -> Result<RecordInvoiceUsageResult, BillingError> {
        let _guard = self.locks.acquire(cmd.user_id.as_str()).await;

        let mut profile = self.profiles.find_or_default(&cmd.user_id).await?;
        let period = UsagePeriod::current();
        let used = profile.invoices_used(&period);
        let quota = max_invoices(profile.selected_plan);

        if !quota.allows(used) {
            return Err(BillingError::quota_exceeded(
                used,
                quota.limit().unwrap_or(used),
            ));
        }

        profile.record_invoice(period.clone(), Timestamp::now());
        match self.profiles.update(&profile).await? {
            UpdateResult::Updated => {}
            UpdateResult::StaleVersion => return Err(BillingError::ConcurrentUpdate),
        }

        Ok(RecordInvoiceUsageResult {
            used: profile.invoices_used(&period),
            limit: quota.limit(),
            period,
            profile,
        })
    }
}
