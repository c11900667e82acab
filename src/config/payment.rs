//! Payment configuration (Stripe).

use serde::Deserialize;

use crate::domain::plan::{PlanId, PriceTable};

use super::error::ValidationError;

/// Payment configuration.
///
/// Each paid plan carries a monthly and an annual price id; together they
/// form the static price → plan table the reconciler resolves against.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key.
    pub stripe_api_key: String,

    /// Stripe webhook signing secret.
    pub stripe_webhook_secret: String,

    #[serde(default)]
    pub price_starter_monthly: Option<String>,
    #[serde(default)]
    pub price_starter_annual: Option<String>,
    #[serde(default)]
    pub price_pro_monthly: Option<String>,
    #[serde(default)]
    pub price_pro_annual: Option<String>,
    #[serde(default)]
    pub price_business_monthly: Option<String>,
    #[serde(default)]
    pub price_business_annual: Option<String>,
    #[serde(default)]
    pub price_enterprise_monthly: Option<String>,
    #[serde(default)]
    pub price_enterprise_annual: Option<String>,
}

impl PaymentConfig {
    /// Check if using Stripe test mode.
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode.
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    /// Build the price → plan table from the configured ids.
    pub fn price_table(&self) -> PriceTable {
        let pairs = [
            (&self.price_starter_monthly, PlanId::Starter),
            (&self.price_starter_annual, PlanId::Starter),
            (&self.price_pro_monthly, PlanId::Pro),
            (&self.price_pro_annual, PlanId::Pro),
            (&self.price_business_monthly, PlanId::Business),
            (&self.price_business_annual, PlanId::Business),
            (&self.price_enterprise_monthly, PlanId::Enterprise),
            (&self.price_enterprise_annual, PlanId::Enterprise),
        ];

        PriceTable::from_pairs(
            pairs
                .into_iter()
                .filter_map(|(id, plan)| id.clone().map(|id| (id, plan))),
        )
    }

    /// Validate payment configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }

        // Verify key prefixes for safety
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if self.price_table().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_PRICE_IDS"));
        }

        Ok(())
    }
}
