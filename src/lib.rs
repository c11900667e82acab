//! Bilibou - Invoice automation backend.
//!
//! Workspaces, plan entitlements, and reconciliation of cached
//! subscription state against the payment provider.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
