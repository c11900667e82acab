//! End-to-end workspace collaboration tests.
//!
//! Drives the workspace handlers against the in-memory repositories:
//! organization creation under plan limits, the invite/accept flow, and
//! member management under the permission matrix.

use std::sync::Arc;

use bilibou::adapters::email::RecordingMailer;
use bilibou::adapters::memory::InMemoryStore;
use bilibou::application::handlers::access::WorkspaceAccess;
use bilibou::application::handlers::workspace::{
    AcceptInviteCommand, AcceptInviteHandler, ChangeMemberRoleCommand, ChangeMemberRoleHandler,
    CreateOrganizationCommand, CreateOrganizationHandler, DeleteWorkspaceCommand,
    DeleteWorkspaceHandler, InviteMemberCommand, InviteMemberHandler, ListWorkspacesHandler,
    ListWorkspacesQuery, RemoveMemberCommand, RemoveMemberHandler,
};
use bilibou::domain::billing::BillingProfile;
use bilibou::domain::foundation::UserId;
use bilibou::domain::plan::PlanId;
use bilibou::domain::workspace::{WorkspaceError, WorkspaceKind, WorkspaceRole};

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

struct Harness {
    store: InMemoryStore,
    mailer: Arc<RecordingMailer>,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: InMemoryStore::new(),
            mailer: Arc::new(RecordingMailer::new()),
        }
    }

    fn access(&self) -> Arc<WorkspaceAccess> {
        Arc::new(WorkspaceAccess::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
        ))
    }

    fn list(&self) -> ListWorkspacesHandler {
        ListWorkspacesHandler::new(Arc::new(self.store.clone()))
    }

    fn create_org(&self) -> CreateOrganizationHandler {
        CreateOrganizationHandler::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
        )
    }

    fn delete(&self) -> DeleteWorkspaceHandler {
        DeleteWorkspaceHandler::new(Arc::new(self.store.clone()), self.access())
    }

    fn invite(&self) -> InviteMemberHandler {
        InviteMemberHandler::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            self.mailer.clone(),
            self.access(),
        )
    }

    fn accept(&self) -> AcceptInviteHandler {
        AcceptInviteHandler::new(Arc::new(self.store.clone()))
    }

    fn remove(&self) -> RemoveMemberHandler {
        RemoveMemberHandler::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            self.access(),
        )
    }

    fn change_role(&self) -> ChangeMemberRoleHandler {
        ChangeMemberRoleHandler::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            self.access(),
        )
    }

    async fn seed_plan(&self, id: &str, plan: PlanId) {
        let mut profile = BillingProfile::new(user(id));
        profile.selected_plan = Some(plan);
        self.store.seed_profile(profile).await;
    }
}

#[tokio::test]
async fn invite_accept_and_manage_members_end_to_end() {
    let harness = Harness::new();
    harness.seed_plan("owner", PlanId::Business).await;

    // Owner creates the organization.
    let org = harness
        .create_org()
        .handle(CreateOrganizationCommand {
            user_id: user("owner"),
            name: "Acme GmbH".to_string(),
        })
        .await
        .unwrap()
        .workspace;

    // Owner invites an admin; the invite email goes out.
    let invite = harness
        .invite()
        .handle(InviteMemberCommand {
            user_id: user("owner"),
            workspace_id: org.id,
            email: "colleague@example.com".to_string(),
            proposed_role: WorkspaceRole::Admin,
        })
        .await
        .unwrap()
        .invite;
    tokio::task::yield_now().await;
    assert_eq!(harness.mailer.sent().len(), 1);

    // The invitee accepts and becomes an active admin.
    let member = harness
        .accept()
        .handle(AcceptInviteCommand {
            user_id: user("colleague"),
            token: invite.token,
        })
        .await
        .unwrap()
        .member;
    assert_eq!(member.role, WorkspaceRole::Admin);

    // The new admin invites a plain member.
    let invite2 = harness
        .invite()
        .handle(InviteMemberCommand {
            user_id: user("colleague"),
            workspace_id: org.id,
            email: "junior@example.com".to_string(),
            proposed_role: WorkspaceRole::Member,
        })
        .await
        .unwrap()
        .invite;
    harness
        .accept()
        .handle(AcceptInviteCommand {
            user_id: user("junior"),
            token: invite2.token,
        })
        .await
        .unwrap();

    // The admin may remove the member, but not the owner.
    let err = harness
        .remove()
        .handle(RemoveMemberCommand {
            user_id: user("colleague"),
            workspace_id: org.id,
            target_user_id: user("owner"),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::Forbidden { .. }));

    harness
        .remove()
        .handle(RemoveMemberCommand {
            user_id: user("colleague"),
            workspace_id: org.id,
            target_user_id: user("junior"),
        })
        .await
        .unwrap();

    // The admin cannot promote themselves to owner.
    let err = harness
        .change_role()
        .handle(ChangeMemberRoleCommand {
            user_id: user("colleague"),
            workspace_id: org.id,
            target_user_id: user("colleague"),
            new_role: WorkspaceRole::Owner,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::Forbidden { .. }));
}

#[tokio::test]
async fn organization_creation_respects_plan_limits() {
    let harness = Harness::new();
    harness.seed_plan("owner", PlanId::Pro).await;

    // Pro allows exactly one organization.
    harness
        .create_org()
        .handle(CreateOrganizationCommand {
            user_id: user("owner"),
            name: "First".to_string(),
        })
        .await
        .unwrap();

    let err = harness
        .create_org()
        .handle(CreateOrganizationCommand {
            user_id: user("owner"),
            name: "Second".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, WorkspaceError::quota_exceeded("organizations", 1, 1));

    // A user with no plan is denied outright.
    let err = harness
        .create_org()
        .handle(CreateOrganizationCommand {
            user_id: user("planless"),
            name: "Nope".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::QuotaExceeded { limit: 0, .. }));
}

#[tokio::test]
async fn listing_creates_personal_and_deletion_cascades() {
    let harness = Harness::new();
    harness.seed_plan("owner", PlanId::Business).await;

    // First listing lazily creates the personal workspace.
    let listing = harness
        .list()
        .handle(ListWorkspacesQuery {
            user_id: user("owner"),
        })
        .await
        .unwrap();
    assert_eq!(listing.owned.len(), 1);
    assert_eq!(listing.owned[0].kind, WorkspaceKind::Personal);

    // Create an organization with a member, then delete it.
    let org = harness
        .create_org()
        .handle(CreateOrganizationCommand {
            user_id: user("owner"),
            name: "Ephemeral".to_string(),
        })
        .await
        .unwrap()
        .workspace;

    let invite = harness
        .invite()
        .handle(InviteMemberCommand {
            user_id: user("owner"),
            workspace_id: org.id,
            email: "m@example.com".to_string(),
            proposed_role: WorkspaceRole::Member,
        })
        .await
        .unwrap()
        .invite;
    harness
        .accept()
        .handle(AcceptInviteCommand {
            user_id: user("m"),
            token: invite.token,
        })
        .await
        .unwrap();

    harness
        .delete()
        .handle(DeleteWorkspaceCommand {
            user_id: user("owner"),
            workspace_id: org.id,
        })
        .await
        .unwrap();

    assert!(harness.store.stored_workspace(&org.id).is_none());
    assert!(harness.store.stored_members(&org.id).is_empty());

    // The ex-member no longer sees the organization.
    let listing = harness
        .list()
        .handle(ListWorkspacesQuery { user_id: user("m") })
        .await
        .unwrap();
    assert!(listing.member_of.is_empty());
}
