//! HTTP adapter for billing endpoints.
//!
//! - `GET  /api/billing/plans` - The static plan catalog
//! - `GET  /api/billing/entitlements` - Plan limits and current usage
//! - `POST /api/billing/cancel` - Cancel the subscription
//! - `POST /api/billing/reactivate` - Undo a pending cancellation
//! - `POST /api/billing/sync` - Pull reconciliation
//! - `POST /api/invoices/usage` - Consume invoice quota
//! - `POST /api/webhooks/stripe` - Signature-verified provider events

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{billing_routes, invoice_routes, webhook_routes};
