//! In-memory adapters.
//!
//! Implement every repository port against process memory. Used by the
//! handler test suites and by local development without a database. Not
//! wired in production.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::billing::BillingProfile;
use crate::domain::email_account::EmailAccount;
use crate::domain::foundation::{
    DomainError, EmailAccountId, ErrorCode, InviteToken, UserId, WorkspaceId,
};
use crate::domain::workspace::{
    InviteStatus, MemberStatus, Workspace, WorkspaceInvite, WorkspaceKind, WorkspaceMember,
    WorkspaceRole,
};
use crate::ports::{
    BillingProfileRepository, EmailAccountRepository, InviteRepository, MemberRepository,
    UpdateResult, WorkspaceRepository,
};

#[derive(Default)]
struct Inner {
    workspaces: Vec<Workspace>,
    members: Vec<WorkspaceMember>,
    invites: Vec<WorkspaceInvite>,
    accounts: Vec<EmailAccount>,
    profiles: Vec<BillingProfile>,
}

/// Shared in-memory backing store implementing all repository ports.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("in-memory store poisoned")
    }

    // Seeding helpers for tests and dev fixtures.

    pub async fn seed_organization(&self, owner: UserId, name: &str) -> Workspace {
        let workspace = Workspace::organization(owner, name).expect("valid name");
        self.lock().workspaces.push(workspace.clone());
        workspace
    }

    pub async fn seed_personal(&self, owner: UserId) -> Workspace {
        let workspace = Workspace::personal(owner);
        self.lock().workspaces.push(workspace.clone());
        workspace
    }

    pub async fn seed_member(&self, member: WorkspaceMember) {
        self.lock().members.push(member);
    }

    pub async fn seed_invite(&self, invite: WorkspaceInvite) {
        self.lock().invites.push(invite);
    }

    pub async fn seed_account(&self, account: EmailAccount) {
        self.lock().accounts.push(account);
    }

    pub async fn seed_profile(&self, profile: BillingProfile) {
        self.lock().profiles.push(profile);
    }

    // Inspection helpers for assertions.

    pub fn stored_profile(&self, user_id: &UserId) -> Option<BillingProfile> {
        self.lock()
            .profiles
            .iter()
            .find(|p| &p.user_id == user_id)
            .cloned()
    }

    pub fn stored_workspace(&self, id: &WorkspaceId) -> Option<Workspace> {
        self.lock().workspaces.iter().find(|w| &w.id == id).cloned()
    }

    pub fn stored_members(&self, workspace_id: &WorkspaceId) -> Vec<WorkspaceMember> {
        self.lock()
            .members
            .iter()
            .filter(|m| &m.workspace_id == workspace_id)
            .cloned()
            .collect()
    }

    pub fn stored_invites(&self) -> Vec<WorkspaceInvite> {
        self.lock().invites.clone()
    }

    pub fn stored_accounts(&self, user_id: &UserId) -> Vec<EmailAccount> {
        self.lock()
            .accounts
            .iter()
            .filter(|a| &a.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl WorkspaceRepository for InMemoryStore {
    async fn insert(&self, workspace: &Workspace) -> Result<(), DomainError> {
        self.lock().workspaces.push(workspace.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &WorkspaceId) -> Result<Option<Workspace>, DomainError> {
        Ok(self
            .lock()
            .workspaces
            .iter()
            .find(|w| &w.id == id && w.is_active)
            .cloned())
    }

    async fn find_personal(&self, owner_id: &UserId) -> Result<Option<Workspace>, DomainError> {
        Ok(self
            .lock()
            .workspaces
            .iter()
            .find(|w| {
                w.kind == WorkspaceKind::Personal && &w.owner_id == owner_id && w.is_active
            })
            .cloned())
    }

    async fn list_owned(&self, owner_id: &UserId) -> Result<Vec<Workspace>, DomainError> {
        Ok(self
            .lock()
            .workspaces
            .iter()
            .filter(|w| &w.owner_id == owner_id && w.is_active)
            .cloned()
            .collect())
    }

    async fn list_member_of(&self, user_id: &UserId) -> Result<Vec<Workspace>, DomainError> {
        let inner = self.lock();
        let workspace_ids: Vec<WorkspaceId> = inner
            .members
            .iter()
            .filter(|m| &m.user_id == user_id && m.status == MemberStatus::Active)
            .map(|m| m.workspace_id)
            .collect();

        Ok(inner
            .workspaces
            .iter()
            .filter(|w| {
                workspace_ids.contains(&w.id) && w.is_active && &w.owner_id != user_id
            })
            .cloned()
            .collect())
    }

    async fn count_active_organizations(&self, owner_id: &UserId) -> Result<u32, DomainError> {
        Ok(self
            .lock()
            .workspaces
            .iter()
            .filter(|w| {
                w.kind == WorkspaceKind::Organization && &w.owner_id == owner_id && w.is_active
            })
            .count() as u32)
    }

    async fn delete_cascade(&self, id: &WorkspaceId) -> Result<(), DomainError> {
        let mut inner = self.lock();
        inner.workspaces.retain(|w| &w.id != id);
        inner.members.retain(|m| &m.workspace_id != id);
        inner.invites.retain(|i| &i.workspace_id != id);
        inner.accounts.retain(|a| a.workspace_id.as_ref() != Some(id));
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for InMemoryStore {
    async fn insert(&self, member: &WorkspaceMember) -> Result<(), DomainError> {
        let mut inner = self.lock();
        let exists = inner
            .members
            .iter()
            .any(|m| m.workspace_id == member.workspace_id && m.user_id == member.user_id);
        if exists {
            return Err(DomainError::new(
                ErrorCode::AlreadyMember,
                "User is already a member of this workspace",
            )
            .with_detail("user_id", member.user_id.to_string()));
        }
        inner.members.push(member.clone());
        Ok(())
    }

    async fn find_active(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<Option<WorkspaceMember>, DomainError> {
        Ok(self
            .lock()
            .members
            .iter()
            .find(|m| {
                &m.workspace_id == workspace_id
                    && &m.user_id == user_id
                    && m.status == MemberStatus::Active
            })
            .cloned())
    }

    async fn list_for_workspace(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<WorkspaceMember>, DomainError> {
        Ok(self
            .lock()
            .members
            .iter()
            .filter(|m| &m.workspace_id == workspace_id)
            .cloned()
            .collect())
    }

    async fn update_role(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
        role: WorkspaceRole,
    ) -> Result<(), DomainError> {
        let mut inner = self.lock();
        let member = inner
            .members
            .iter_mut()
            .find(|m| &m.workspace_id == workspace_id && &m.user_id == user_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::MemberNotFound, "Member not found")
                    .with_detail("user_id", user_id.to_string())
            })?;
        member.role = role;
        Ok(())
    }

    async fn remove(
        &self,
        workspace_id: &WorkspaceId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let mut inner = self.lock();
        let before = inner.members.len();
        inner
            .members
            .retain(|m| !(&m.workspace_id == workspace_id && &m.user_id == user_id));
        if inner.members.len() == before {
            return Err(DomainError::new(ErrorCode::MemberNotFound, "Member not found")
                .with_detail("user_id", user_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl InviteRepository for InMemoryStore {
    async fn insert(&self, invite: &WorkspaceInvite) -> Result<(), DomainError> {
        self.lock().invites.push(invite.clone());
        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &InviteToken,
    ) -> Result<Option<WorkspaceInvite>, DomainError> {
        Ok(self
            .lock()
            .invites
            .iter()
            .find(|i| &i.token == token)
            .cloned())
    }

    async fn complete(
        &self,
        invite: &WorkspaceInvite,
        member: &WorkspaceMember,
    ) -> Result<(), DomainError> {
        let mut inner = self.lock();

        let exists = inner
            .members
            .iter()
            .any(|m| m.workspace_id == member.workspace_id && m.user_id == member.user_id);
        if exists {
            return Err(DomainError::new(
                ErrorCode::AlreadyMember,
                "User is already a member of this workspace",
            )
            .with_detail("user_id", member.user_id.to_string()));
        }

        let stored = inner
            .invites
            .iter_mut()
            .find(|i| i.token == invite.token)
            .ok_or_else(|| DomainError::new(ErrorCode::InviteNotFound, "Invite not found"))?;
        stored.status = InviteStatus::Accepted;
        inner.members.push(member.clone());
        Ok(())
    }
}

#[async_trait]
impl EmailAccountRepository for InMemoryStore {
    async fn insert(&self, account: &EmailAccount) -> Result<(), DomainError> {
        self.lock().accounts.push(account.clone());
        Ok(())
    }

    async fn count_active(&self, user_id: &UserId) -> Result<u32, DomainError> {
        Ok(self
            .lock()
            .accounts
            .iter()
            .filter(|a| &a.user_id == user_id && a.is_active)
            .count() as u32)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<EmailAccount>, DomainError> {
        Ok(self
            .lock()
            .accounts
            .iter()
            .filter(|a| &a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        id: &EmailAccountId,
    ) -> Result<Option<EmailAccount>, DomainError> {
        Ok(self.lock().accounts.iter().find(|a| &a.id == id).cloned())
    }

    async fn deactivate(&self, id: &EmailAccountId) -> Result<(), DomainError> {
        let mut inner = self.lock();
        let account = inner
            .accounts
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::EmailAccountNotFound, "Email account not found")
            })?;
        account.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl BillingProfileRepository for InMemoryStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<BillingProfile>, DomainError> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .find(|p| &p.user_id == user_id)
            .cloned())
    }

    async fn find_by_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<BillingProfile>, DomainError> {
        Ok(self
            .lock()
            .profiles
            .iter()
            .find(|p| p.stripe_customer_id.as_deref() == Some(customer_id))
            .cloned())
    }

    async fn update(&self, profile: &BillingProfile) -> Result<UpdateResult, DomainError> {
        let mut inner = self.lock();
        match inner
            .profiles
            .iter_mut()
            .find(|p| p.user_id == profile.user_id)
        {
            Some(stored) => {
                if stored.version != profile.version {
                    return Ok(UpdateResult::StaleVersion);
                }
                *stored = profile.clone();
                stored.version += 1;
                Ok(UpdateResult::Updated)
            }
            None if profile.version == 0 => {
                let mut fresh = profile.clone();
                fresh.version = 1;
                inner.profiles.push(fresh);
                Ok(UpdateResult::Updated)
            }
            None => Ok(UpdateResult::StaleVersion),
        }
    }

    async fn clear_customer_id(&self, user_id: &UserId) -> Result<(), DomainError> {
        let mut inner = self.lock();
        if let Some(profile) = inner.profiles.iter_mut().find(|p| &p.user_id == user_id) {
            profile.stripe_customer_id = None;
            profile.version += 1;
        }
        Ok(())
    }
}
