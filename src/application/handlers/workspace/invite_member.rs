//! InviteMemberHandler - Command handler for inviting a user.
//!
//! Owner and admin may invite; only the owner may propose the `owner`
//! role. The invite email is dispatched fire-and-forget: a mail failure is
//! logged and never fails the request.

use std::sync::Arc;

use crate::application::handlers::access::WorkspaceAccess;
use crate::domain::foundation::{UserId, WorkspaceId};
use crate::domain::workspace::{
    can_invite_with_role, WorkspaceError, WorkspaceInvite, WorkspaceRole,
};
use crate::ports::{InviteRepository, Mailer, OutboundEmail, WorkspaceRepository};

/// Command to invite a user into a workspace.
#[derive(Debug, Clone)]
pub struct InviteMemberCommand {
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub email: String,
    pub proposed_role: WorkspaceRole,
}

/// Result of a successful invitation.
#[derive(Debug, Clone)]
pub struct InviteMemberResult {
    pub invite: WorkspaceInvite,
}

/// Handler for member invitations.
pub struct InviteMemberHandler {
    workspaces: Arc<dyn WorkspaceRepository>,
    invites: Arc<dyn InviteRepository>,
    mailer: Arc<dyn Mailer>,
    access: Arc<WorkspaceAccess>,
}

impl InviteMemberHandler {
    pub fn new(
        workspaces: Arc<dyn WorkspaceRepository>,
        invites: Arc<dyn InviteRepository>,
        mailer: Arc<dyn Mailer>,
        access: Arc<WorkspaceAccess>,
    ) -> Self {
        Self {
            workspaces,
            invites,
            mailer,
            access,
        }
    }

    pub async fn handle(
        &self,
        cmd: InviteMemberCommand,
    ) -> Result<InviteMemberResult, WorkspaceError> {
        if !cmd.email.contains('@') {
            return Err(WorkspaceError::validation("email", "not an email address"));
        }

        let workspace = self
            .workspaces
            .find_by_id(&cmd.workspace_id)
            .await?
            .ok_or(WorkspaceError::WorkspaceNotFound(cmd.workspace_id))?;

        let role = self.access.role_in(&workspace, &cmd.user_id).await?;
        if !can_invite_with_role(role, cmd.proposed_role) {
            return Err(WorkspaceError::forbidden(format!(
                "invite a {} to this workspace",
                cmd.proposed_role
            )));
        }

        let invite = WorkspaceInvite::new(
            cmd.workspace_id,
            cmd.email.clone(),
            cmd.proposed_role,
            cmd.user_id.clone(),
        );
        self.invites.insert(&invite).await?;

        // Fire-and-forget notification.
        let mailer = self.mailer.clone();
        let email = invite_email(&workspace.name, &invite);
        tokio::spawn(async move {
            if let Err(e) = mailer.send(email).await {
                tracing::warn!(error = %e, "invite email dispatch failed");
            }
        });

        tracing::info!(
            workspace_id = %cmd.workspace_id,
            invited_by = %cmd.user_id,
            role = %cmd.proposed_role,
            "member invited"
        );
        Ok(InviteMemberResult { invite })
    }
}

fn invite_email(workspace_name: &str, invite: &WorkspaceInvite) -> OutboundEmail {
    OutboundEmail {
        to: invite.email.clone(),
        subject: format!("You have been invited to {}", workspace_name),
        html_body: format!(
            "<p>You have been invited to join <b>{}</b> as {}.</p>\
             <p>Accept with token <code>{}</code> within {} days.</p>",
            workspace_name,
            invite.proposed_role,
            invite.token,
            crate::domain::workspace::INVITE_VALIDITY_DAYS,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::RecordingMailer;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::workspace::{InviteStatus, WorkspaceMember};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn handler(store: &InMemoryStore, mailer: Arc<RecordingMailer>) -> InviteMemberHandler {
        let access = Arc::new(WorkspaceAccess::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        ));
        InviteMemberHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            mailer,
            access,
        )
    }

    fn cmd(ws: WorkspaceId, by: &str, role: WorkspaceRole) -> InviteMemberCommand {
        InviteMemberCommand {
            user_id: user(by),
            workspace_id: ws,
            email: "invitee@example.com".to_string(),
            proposed_role: role,
        }
    }

    #[tokio::test]
    async fn owner_invites_a_member() {
        let store = InMemoryStore::new();
        let ws = store.seed_organization(user("owner"), "Acme").await;
        let mailer = Arc::new(RecordingMailer::new());

        let result = handler(&store, mailer)
            .handle(cmd(ws.id, "owner", WorkspaceRole::Member))
            .await
            .unwrap();

        assert_eq!(result.invite.status, InviteStatus::Pending);
        assert_eq!(result.invite.proposed_role, WorkspaceRole::Member);
        assert_eq!(store.stored_invites().len(), 1);
    }

    #[tokio::test]
    async fn admin_invites_admin_but_not_owner() {
        let store = InMemoryStore::new();
        let ws = store.seed_organization(user("owner"), "Acme").await;
        store
            .seed_member(WorkspaceMember::active(
                ws.id,
                user("admin"),
                WorkspaceRole::Admin,
                None,
            ))
            .await;
        let mailer = Arc::new(RecordingMailer::new());
        let handler = handler(&store, mailer);

        assert!(handler
            .handle(cmd(ws.id, "admin", WorkspaceRole::Admin))
            .await
            .is_ok());

        let err = handler
            .handle(cmd(ws.id, "admin", WorkspaceRole::Owner))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn owner_may_propose_owner() {
        let store = InMemoryStore::new();
        let ws = store.seed_organization(user("owner"), "Acme").await;

        let result = handler(&store, Arc::new(RecordingMailer::new()))
            .handle(cmd(ws.id, "owner", WorkspaceRole::Owner))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn member_cannot_invite() {
        let store = InMemoryStore::new();
        let ws = store.seed_organization(user("owner"), "Acme").await;
        store
            .seed_member(WorkspaceMember::active(
                ws.id,
                user("m"),
                WorkspaceRole::Member,
                None,
            ))
            .await;

        let err = handler(&store, Arc::new(RecordingMailer::new()))
            .handle(cmd(ws.id, "m", WorkspaceRole::Member))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn mail_failure_does_not_fail_the_request() {
        let store = InMemoryStore::new();
        let ws = store.seed_organization(user("owner"), "Acme").await;
        let mailer = Arc::new(RecordingMailer::failing());

        let result = handler(&store, mailer)
            .handle(cmd(ws.id, "owner", WorkspaceRole::Member))
            .await;

        assert!(result.is_ok());
        assert_eq!(store.stored_invites().len(), 1);
    }

    #[tokio::test]
    async fn invite_email_is_dispatched() {
        let store = InMemoryStore::new();
        let ws = store.seed_organization(user("owner"), "Acme").await;
        let mailer = Arc::new(RecordingMailer::new());

        handler(&store, mailer.clone())
            .handle(cmd(ws.id, "owner", WorkspaceRole::Member))
            .await
            .unwrap();

        // The send is spawned; give it a tick to land.
        tokio::task::yield_now().await;
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "invitee@example.com");
        assert!(sent[0].subject.contains("Acme"));
    }

    #[tokio::test]
    async fn malformed_email_is_rejected() {
        let store = InMemoryStore::new();
        let ws = store.seed_organization(user("owner"), "Acme").await;

        let mut bad = cmd(ws.id, "owner", WorkspaceRole::Member);
        bad.email = "nope".to_string();

        let err = handler(&store, Arc::new(RecordingMailer::new()))
            .handle(bad)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::ValidationFailed { .. }));
    }
}
