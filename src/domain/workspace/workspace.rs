//! Workspace aggregate.
//!
//! # Invariants
//!
//! - Every user has exactly one personal workspace, created lazily on first
//!   listing if absent.
//! - Organization workspaces are created explicitly and count against the
//!   owner's plan limit.
//! - Deleting a workspace cascades to its invoices, email-account links,
//!   members, and invites inside one transaction.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId, ValidationError, WorkspaceId};

/// Whether a workspace is an individual's space or a shared organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceKind {
    Personal,
    Organization,
}

impl WorkspaceKind {
    /// Lowercase storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceKind::Personal => "personal",
            WorkspaceKind::Organization => "organization",
        }
    }

    /// Parses the lowercase storage form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "personal" => Some(WorkspaceKind::Personal),
            "organization" => Some(WorkspaceKind::Organization),
            _ => None,
        }
    }
}

/// A tenant boundary: personal space or shared organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub kind: WorkspaceKind,
    pub owner_id: UserId,
    pub is_active: bool,
    pub logo_url: Option<String>,
    pub created_at: Timestamp,
}

impl Workspace {
    /// Creates the user's personal workspace.
    pub fn personal(owner_id: UserId) -> Self {
        Self {
            id: WorkspaceId::new(),
            name: "Personal".to_string(),
            kind: WorkspaceKind::Personal,
            owner_id,
            is_active: true,
            logo_url: None,
            created_at: Timestamp::now(),
        }
    }

    /// Creates an organization workspace.
    ///
    /// # Errors
    ///
    /// Rejects an empty name.
    pub fn organization(owner_id: UserId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id: WorkspaceId::new(),
            name,
            kind: WorkspaceKind::Organization,
            owner_id,
            is_active: true,
            logo_url: None,
            created_at: Timestamp::now(),
        })
    }

    /// True if the given user is the designated owner.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }
}
