//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the Bilibou domain.

mod errors;
mod ids;
mod period;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{EmailAccountId, InviteToken, UserId, WorkspaceId};
pub use period::UsagePeriod;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
