//! Billing module - Cached subscription state and reconciliation.
//!
//! The payment provider holds the authoritative subscription record; the
//! [`BillingProfile`] is a typed local projection of it. The reconciler
//! contains the pure selection and projection rules that turn provider
//! truth into cached state.

mod errors;
mod profile;
mod reconciler;
mod status;

pub use errors::BillingError;
pub use profile::BillingProfile;
pub use reconciler::{
    find_reactivatable, project, select_cancellable, select_for_sync, Reactivatable,
    SubscriptionProjection,
};
pub use status::SubscriptionStatus;
