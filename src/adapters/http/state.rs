//! Shared application state for the HTTP layer.
//!
//! Cloned per request; all dependencies are Arc-wrapped. Handlers are
//! constructed on demand from the state.

use std::sync::Arc;

use crate::application::handlers::access::WorkspaceAccess;
use crate::application::handlers::billing::{
    CancelSubscriptionHandler, ReactivateSubscriptionHandler, RecordInvoiceUsageHandler,
    SyncPlanHandler,
};
use crate::application::handlers::email_account::{
    ConnectEmailAccountHandler, DisconnectEmailAccountHandler,
};
use crate::application::handlers::workspace::{
    AcceptInviteHandler, ChangeMemberRoleHandler, CreateOrganizationHandler,
    DeleteWorkspaceHandler, InviteMemberHandler, ListWorkspacesHandler, RemoveMemberHandler,
};
use crate::application::single_flight::KeyedLock;
use crate::domain::plan::PriceTable;
use crate::ports::{
    BillingProfileRepository, EmailAccountRepository, InviteRepository, Mailer, MemberRepository,
    PaymentProvider, SessionVerifier, WorkspaceRepository,
};

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct AppState {
    pub workspaces: Arc<dyn WorkspaceRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub invites: Arc<dyn InviteRepository>,
    pub email_accounts: Arc<dyn EmailAccountRepository>,
    pub billing_profiles: Arc<dyn BillingProfileRepository>,
    pub payments: Arc<dyn PaymentProvider>,
    pub mailer: Arc<dyn Mailer>,
    pub sessions: Arc<dyn SessionVerifier>,
    pub prices: Arc<PriceTable>,
    pub locks: Arc<KeyedLock>,
}

impl AppState {
    pub fn access(&self) -> Arc<WorkspaceAccess> {
        Arc::new(WorkspaceAccess::new(
            self.workspaces.clone(),
            self.members.clone(),
        ))
    }

    pub fn list_workspaces_handler(&self) -> ListWorkspacesHandler {
        ListWorkspacesHandler::new(self.workspaces.clone())
    }

    pub fn create_organization_handler(&self) -> CreateOrganizationHandler {
        CreateOrganizationHandler::new(
            self.workspaces.clone(),
            self.members.clone(),
            self.billing_profiles.clone(),
        )
    }

    pub fn delete_workspace_handler(&self) -> DeleteWorkspaceHandler {
        DeleteWorkspaceHandler::new(self.workspaces.clone(), self.access())
    }

    pub fn invite_member_handler(&self) -> InviteMemberHandler {
        InviteMemberHandler::new(
            self.workspaces.clone(),
            self.invites.clone(),
            self.mailer.clone(),
            self.access(),
        )
    }

    pub fn accept_invite_handler(&self) -> AcceptInviteHandler {
        AcceptInviteHandler::new(self.invites.clone())
    }

    pub fn remove_member_handler(&self) -> RemoveMemberHandler {
        RemoveMemberHandler::new(self.workspaces.clone(), self.members.clone(), self.access())
    }

    pub fn change_member_role_handler(&self) -> ChangeMemberRoleHandler {
        ChangeMemberRoleHandler::new(self.workspaces.clone(), self.members.clone(), self.access())
    }

    pub fn connect_email_account_handler(&self) -> ConnectEmailAccountHandler {
        ConnectEmailAccountHandler::new(
            self.email_accounts.clone(),
            self.billing_profiles.clone(),
        )
    }

    pub fn disconnect_email_account_handler(&self) -> DisconnectEmailAccountHandler {
        DisconnectEmailAccountHandler::new(self.email_accounts.clone())
    }

    pub fn cancel_subscription_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(
            self.billing_profiles.clone(),
            self.payments.clone(),
            self.locks.clone(),
        )
    }

    pub fn reactivate_subscription_handler(&self) -> ReactivateSubscriptionHandler {
        ReactivateSubscriptionHandler::new(
            self.billing_profiles.clone(),
            self.payments.clone(),
            self.prices.clone(),
            self.locks.clone(),
        )
    }

    pub fn sync_plan_handler(&self) -> SyncPlanHandler {
        SyncPlanHandler::new(
            self.billing_profiles.clone(),
            self.payments.clone(),
            self.prices.clone(),
            self.locks.clone(),
        )
    }

    pub fn record_invoice_usage_handler(&self) -> RecordInvoiceUsageHandler {
        RecordInvoiceUsageHandler::new(self.billing_profiles.clone(), self.locks.clone())
    }
}
