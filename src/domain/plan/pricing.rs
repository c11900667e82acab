//! Provider price → plan mapping.
//!
//! The payment provider identifies what was bought by a price id; this
//! table maps those ids back to internal plans. An unrecognized price must
//! surface as an explicit error at the reconciliation boundary, never a
//! guessed plan.

use super::PlanId;
use std::collections::HashMap;

/// Static mapping from provider price ids to plans.
///
/// Each paid plan has a monthly and an annual price id. Built once from
/// configuration at startup.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    entries: HashMap<String, PlanId>,
}

impl PriceTable {
    /// Builds an empty table. Every lookup will miss.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from (price id, plan) pairs, skipping empty ids.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, PlanId)>,
        S: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(id, plan)| (id.into(), plan))
            .filter(|(id, _)| !id.is_empty())
            .collect();
        Self { entries }
    }

    /// Resolves a provider price id to a plan, if recognized.
    pub fn resolve(&self, price_id: &str) -> Option<PlanId> {
        self.entries.get(price_id).copied()
    }

    /// Number of registered price ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no price ids are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
