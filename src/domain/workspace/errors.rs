//! Workspace-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Forbidden | 403 |
//! | QuotaExceeded | 403 |
//! | WorkspaceNotFound / MemberNotFound / InviteNotFound | 404 |
//! | AlreadyMember | 409 |
//! | InviteExpired | 410 |
//! | InviteAlreadyAccepted | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{ErrorCode, UserId, WorkspaceId};

/// Workspace, membership, and invitation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    /// Requester lacks the role/capability for the action.
    Forbidden { action: String },

    /// Plan limit reached for a bounded resource.
    QuotaExceeded {
        resource: &'static str,
        current: u32,
        limit: u32,
    },

    /// Workspace does not exist or is inactive.
    WorkspaceNotFound(WorkspaceId),

    /// No membership row for the target user.
    MemberNotFound { user_id: UserId },

    /// Invite token is unknown.
    InviteNotFound,

    /// Invite expired before acceptance; terminal.
    InviteExpired,

    /// Invite has already been consumed.
    InviteAlreadyAccepted,

    /// The user is already a member of the workspace.
    AlreadyMember { user_id: UserId },

    /// Input validation failed.
    ValidationFailed { field: String, message: String },

    /// Storage failure.
    Infrastructure(String),
}

impl WorkspaceError {
    pub fn forbidden(action: impl Into<String>) -> Self {
        WorkspaceError::Forbidden {
            action: action.into(),
        }
    }

    pub fn quota_exceeded(resource: &'static str, current: u32, limit: u32) -> Self {
        WorkspaceError::QuotaExceeded {
            resource,
            current,
            limit,
        }
    }

    pub fn workspace_not_found(id: WorkspaceId) -> Self {
        WorkspaceError::WorkspaceNotFound(id)
    }

    pub fn member_not_found(user_id: UserId) -> Self {
        WorkspaceError::MemberNotFound { user_id }
    }

    pub fn already_member(user_id: UserId) -> Self {
        WorkspaceError::AlreadyMember { user_id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WorkspaceError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        WorkspaceError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            WorkspaceError::Forbidden { .. } => ErrorCode::Forbidden,
            WorkspaceError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            WorkspaceError::WorkspaceNotFound(_) => ErrorCode::WorkspaceNotFound,
            WorkspaceError::MemberNotFound { .. } => ErrorCode::MemberNotFound,
            WorkspaceError::InviteNotFound => ErrorCode::InviteNotFound,
            WorkspaceError::InviteExpired => ErrorCode::InviteExpired,
            WorkspaceError::InviteAlreadyAccepted => ErrorCode::Conflict,
            WorkspaceError::AlreadyMember { .. } => ErrorCode::AlreadyMember,
            WorkspaceError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            WorkspaceError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            WorkspaceError::Forbidden { action } => {
                format!("Not allowed to {}", action)
            }
            WorkspaceError::QuotaExceeded {
                resource,
                current,
                limit,
            } => format!(
                "Plan limit reached: {} of {} {} in use",
                current, limit, resource
            ),
            WorkspaceError::WorkspaceNotFound(id) => format!("Workspace not found: {}", id),
            WorkspaceError::MemberNotFound { user_id } => {
                format!("User {} is not a member of this workspace", user_id)
            }
            WorkspaceError::InviteNotFound => "Invitation not found".to_string(),
            WorkspaceError::InviteExpired => "Invitation has expired".to_string(),
            WorkspaceError::InviteAlreadyAccepted => {
                "Invitation has already been accepted".to_string()
            }
            WorkspaceError::AlreadyMember { user_id } => {
                format!("User {} is already a member of this workspace", user_id)
            }
            WorkspaceError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            WorkspaceError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkspaceError::Infrastructure(_))
    }
}

impl std::fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for WorkspaceError {}

impl From<crate::domain::foundation::DomainError> for WorkspaceError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        // Adapters attach a user_id detail to membership constraint errors.
        let detail_user = || {
            err.details
                .get("user_id")
                .and_then(|u| UserId::new(u.clone()).ok())
                .unwrap_or_else(|| UserId::new("unknown").expect("non-empty literal"))
        };

        match err.code {
            ErrorCode::AlreadyMember => WorkspaceError::AlreadyMember {
                user_id: detail_user(),
            },
            ErrorCode::MemberNotFound => WorkspaceError::MemberNotFound {
                user_id: detail_user(),
            },
            _ => WorkspaceError::Infrastructure(err.to_string()),
        }
    }
}
