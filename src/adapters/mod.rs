//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - JWT session verification
//! - `email` - Resend transactional email
//! - `http` - Axum REST API
//! - `memory` - In-memory repositories for tests and local development
//! - `postgres` - sqlx-backed repositories
//! - `stripe` - Stripe payment provider

pub mod auth;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
