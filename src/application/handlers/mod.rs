//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations through
//! the ports. One file per operation; each handler takes its dependencies
//! as `Arc<dyn Port>` and is exercised against the in-memory adapters.

pub mod access;
pub mod billing;
pub mod email_account;
pub mod workspace;
