//! PostgreSQL adapters.
//!
//! sqlx-backed implementations of the repository ports. Schema lives in
//! `migrations/`.

mod billing_profile_repository;
mod email_account_repository;
mod invite_repository;
mod member_repository;
mod workspace_repository;

pub use billing_profile_repository::PostgresBillingProfileRepository;
pub use email_account_repository::PostgresEmailAccountRepository;
pub use invite_repository::PostgresInviteRepository;
pub use member_repository::PostgresMemberRepository;
pub use workspace_repository::PostgresWorkspaceRepository;
