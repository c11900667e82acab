//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.

mod billing_profile_repository;
mod email_account_repository;
mod invite_repository;
mod mailer;
mod member_repository;
mod payment_provider;
mod session_verifier;
mod workspace_repository;

pub use billing_profile_repository::{BillingProfileRepository, UpdateResult};
pub use email_account_repository::EmailAccountRepository;
pub use invite_repository::InviteRepository;
pub use mailer::{Mailer, MailerError, OutboundEmail};
pub use member_repository::MemberRepository;
pub use payment_provider::{
    PaymentError, PaymentErrorCode, PaymentProvider, ProviderCustomer, ProviderSubscription,
    ProviderSubscriptionStatus, WebhookEvent, WebhookEventType,
};
pub use session_verifier::{AuthError, SessionVerifier};
pub use workspace_repository::WorkspaceRepository;
