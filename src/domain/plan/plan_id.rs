//! Plan identifiers.

use serde::{Deserialize, Serialize};

/// Subscription plan tier.
///
/// Determines email-account limits, organization limits, invoice volume,
/// and the auto-export capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    /// Entry tier for individuals.
    Starter,

    /// Small-team tier, first tier allowed to create an organization.
    Pro,

    /// Multi-organization tier for growing companies.
    Business,

    /// Top tier with unlimited invoice volume.
    Enterprise,
}

impl PlanId {
    /// Returns the display name for this plan.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanId::Starter => "Starter",
            PlanId::Pro => "Pro",
            PlanId::Business => "Business",
            PlanId::Enterprise => "Enterprise",
        }
    }

    /// Returns the numeric rank of this plan for comparison.
    ///
    /// Higher rank = more entitlements.
    pub fn rank(&self) -> u8 {
        match self {
            PlanId::Starter => 0,
            PlanId::Pro => 1,
            PlanId::Business => 2,
            PlanId::Enterprise => 3,
        }
    }

    /// Parses the lowercase wire/storage form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "starter" => Some(PlanId::Starter),
            "pro" => Some(PlanId::Pro),
            "business" => Some(PlanId::Business),
            "enterprise" => Some(PlanId::Enterprise),
            _ => None,
        }
    }

    /// Lowercase storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Starter => "starter",
            PlanId::Pro => "pro",
            PlanId::Business => "business",
            PlanId::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
