//! CreateOrganizationHandler - Command handler for organization creation.
//!
//! Organization creation is entitlement-gated: the owner's plan must allow
//! one more organization than they currently own. A user without a plan is
//! always denied. The created workspace gets an explicit owner membership
//! row; the owner resolves identically with or without it.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::plan::{can_create_organization, PlanLimits};
use crate::domain::workspace::{Workspace, WorkspaceError, WorkspaceMember};
use crate::ports::{BillingProfileRepository, MemberRepository, WorkspaceRepository};

/// Command to create an organization workspace.
#[derive(Debug, Clone)]
pub struct CreateOrganizationCommand {
    pub user_id: UserId,
    pub name: String,
}

/// Result of a successful creation.
#[derive(Debug, Clone)]
pub struct CreateOrganizationResult {
    pub workspace: Workspace,
}

/// Handler for organization creation.
pub struct CreateOrganizationHandler {
    workspaces: Arc<dyn WorkspaceRepository>,
    members: Arc<dyn MemberRepository>,
    profiles: Arc<dyn BillingProfileRepository>,
}

impl CreateOrganizationHandler {
    pub fn new(
        workspaces: Arc<dyn WorkspaceRepository>,
        members: Arc<dyn MemberRepository>,
        profiles: Arc<dyn BillingProfileRepository>,
    ) -> Self {
        Self {
            workspaces,
            members,
            profiles,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateOrganizationCommand,
    ) -> Result<CreateOrganizationResult, WorkspaceError> {
        let profile = self
            .profiles
            .find_or_default(&cmd.user_id)
            .await
            .map_err(|e| WorkspaceError::infrastructure(e.to_string()))?;
        let plan = profile.selected_plan;

        let current = self
            .workspaces
            .count_active_organizations(&cmd.user_id)
            .await?;

        if !can_create_organization(plan, current) {
            let limit = plan
                .map(|p| PlanLimits::for_plan(p).max_organizations.unwrap_or(u32::MAX))
                .unwrap_or(0);
            return Err(WorkspaceError::quota_exceeded(
                "organizations",
                current,
                limit,
            ));
        }

        let workspace = Workspace::organization(cmd.user_id.clone(), cmd.name)
            .map_err(|e| WorkspaceError::validation("name", e.to_string()))?;
        self.workspaces.insert(&workspace).await?;

        // Explicit owner row; resolution does not depend on it.
        let owner_row = WorkspaceMember::owner_row(workspace.id, cmd.user_id.clone());
        self.members.insert(&owner_row).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            workspace_id = %workspace.id,
            "organization created"
        );
        Ok(CreateOrganizationResult { workspace })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::billing::BillingProfile;
    use crate::domain::plan::PlanId;
    use crate::domain::workspace::WorkspaceRole;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn handler(store: &InMemoryStore) -> CreateOrganizationHandler {
        CreateOrganizationHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
    }

    async fn seed_plan(store: &InMemoryStore, id: &str, plan: PlanId) {
        let mut profile = BillingProfile::new(user(id));
        profile.selected_plan = Some(plan);
        store.seed_profile(profile).await;
    }

    #[tokio::test]
    async fn pro_user_creates_first_organization() {
        let store = InMemoryStore::new();
        seed_plan(&store, "u", PlanId::Pro).await;

        let result = handler(&store)
            .handle(CreateOrganizationCommand {
                user_id: user("u"),
                name: "Acme".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.workspace.name, "Acme");
        // The explicit owner row is present.
        let members = store.stored_members(&result.workspace.id);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, WorkspaceRole::Owner);
    }

    #[tokio::test]
    async fn user_without_plan_is_always_denied() {
        let store = InMemoryStore::new();

        let err = handler(&store)
            .handle(CreateOrganizationCommand {
                user_id: user("u"),
                name: "Acme".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkspaceError::QuotaExceeded {
                resource: "organizations",
                current: 0,
                limit: 0
            }
        ));
    }

    #[tokio::test]
    async fn starter_plan_is_denied() {
        let store = InMemoryStore::new();
        seed_plan(&store, "u", PlanId::Starter).await;

        let err = handler(&store)
            .handle(CreateOrganizationCommand {
                user_id: user("u"),
                name: "Acme".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WorkspaceError::QuotaExceeded { .. }));
    }

    #[tokio::test]
    async fn pro_second_organization_exceeds_quota_with_numbers() {
        let store = InMemoryStore::new();
        seed_plan(&store, "u", PlanId::Pro).await;
        store.seed_organization(user("u"), "First").await;

        let err = handler(&store)
            .handle(CreateOrganizationCommand {
                user_id: user("u"),
                name: "Second".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, WorkspaceError::quota_exceeded("organizations", 1, 1));
    }

    #[tokio::test]
    async fn enterprise_is_never_capped() {
        let store = InMemoryStore::new();
        seed_plan(&store, "u", PlanId::Enterprise).await;
        for i in 0..20 {
            store.seed_organization(user("u"), &format!("Org {}", i)).await;
        }

        let result = handler(&store)
            .handle(CreateOrganizationCommand {
                user_id: user("u"),
                name: "One more".to_string(),
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let store = InMemoryStore::new();
        seed_plan(&store, "u", PlanId::Business).await;

        let err = handler(&store)
            .handle(CreateOrganizationCommand {
                user_id: user("u"),
                name: "  ".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WorkspaceError::ValidationFailed { .. }));
    }
}
