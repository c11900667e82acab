//! Stripe adapters.
//!
//! - `StripePaymentAdapter` - production `PaymentProvider` over the
//!   Stripe REST API
//! - `MockPaymentProvider` - in-memory provider for tests and local
//!   development

mod mock_payment_provider;
mod stripe_adapter;
pub mod webhook_types;

pub use mock_payment_provider::{MockPaymentProvider, MOCK_WEBHOOK_SIGNATURE};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
