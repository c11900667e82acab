//! Workspace invite repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InviteToken};
use crate::domain::workspace::{WorkspaceInvite, WorkspaceMember};

/// Repository port for workspace invitations.
#[async_trait]
pub trait InviteRepository: Send + Sync {
    /// Save a new invitation.
    async fn insert(&self, invite: &WorkspaceInvite) -> Result<(), DomainError>;

    /// Look up an invitation by its token.
    async fn find_by_token(
        &self,
        token: &InviteToken,
    ) -> Result<Option<WorkspaceInvite>, DomainError>;

    /// Consume an accepted invitation: persist its accepted status and
    /// insert the resulting membership row in one transaction, so a crash
    /// can never leave a consumed invite without its member (or vice
    /// versa).
    ///
    /// # Errors
    ///
    /// `AlreadyMember` when the invitee already has a membership row.
    async fn complete(
        &self,
        invite: &WorkspaceInvite,
        member: &WorkspaceMember,
    ) -> Result<(), DomainError>;
}
