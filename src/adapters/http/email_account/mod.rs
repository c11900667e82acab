//! HTTP adapter for email account endpoints.
//!
//! - `GET    /api/email-accounts` - List connected mailboxes
//! - `POST   /api/email-accounts` - Record a connected mailbox
//! - `DELETE /api/email-accounts/:id` - Disconnect a mailbox

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::email_account_routes;
