//! Workspace invitations.
//!
//! An invite is created by an authorized member, emailed to the invitee,
//! and consumed exactly once before its expiry. Expired or already-accepted
//! invites are terminal.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{InviteToken, StateMachine, Timestamp, UserId, WorkspaceId};

use super::{WorkspaceError, WorkspaceRole};

/// Days an invitation stays valid.
pub const INVITE_VALIDITY_DAYS: i64 = 7;

/// Invitation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
}

impl InviteStatus {
    /// Lowercase storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
        }
    }

    /// Parses the lowercase storage form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InviteStatus::Pending),
            "accepted" => Some(InviteStatus::Accepted),
            _ => None,
        }
    }
}

impl StateMachine for InviteStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (InviteStatus::Pending, InviteStatus::Accepted))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            InviteStatus::Pending => vec![InviteStatus::Accepted],
            InviteStatus::Accepted => vec![],
        }
    }
}

/// A pending invitation into a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInvite {
    pub token: InviteToken,
    pub workspace_id: WorkspaceId,
    pub email: String,
    pub proposed_role: WorkspaceRole,
    pub status: InviteStatus,
    pub expires_at: Timestamp,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

impl WorkspaceInvite {
    /// Creates a pending invite valid for [`INVITE_VALIDITY_DAYS`].
    pub fn new(
        workspace_id: WorkspaceId,
        email: impl Into<String>,
        proposed_role: WorkspaceRole,
        created_by: UserId,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            token: InviteToken::generate(),
            workspace_id,
            email: email.into(),
            proposed_role,
            status: InviteStatus::Pending,
            expires_at: now.add_days(INVITE_VALIDITY_DAYS),
            created_by,
            created_at: now,
        }
    }

    /// True if the invite can no longer be accepted due to age.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    /// Consume the invite.
    ///
    /// # Errors
    ///
    /// - `InviteExpired` past the expiry timestamp.
    /// - `InviteAlreadyAccepted` when consumed before.
    pub fn accept(&mut self, now: Timestamp) -> Result<(), WorkspaceError> {
        if self.status == InviteStatus::Accepted {
            return Err(WorkspaceError::InviteAlreadyAccepted);
        }
        if self.is_expired(now) {
            return Err(WorkspaceError::InviteExpired);
        }
        self.status = self
            .status
            .transition_to(InviteStatus::Accepted)
            .map_err(|e| WorkspaceError::infrastructure(e.to_string()))?;
        Ok(())
    }
}
