//! Workspace-scoped roles.

use serde::{Deserialize, Serialize};

/// Permission level within one workspace.
///
/// `Owner` is derived from the workspace's owner field and never required
/// to exist as a membership row; the other roles live on membership rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceRole {
    /// The workspace's designated owner. Full control.
    Owner,

    /// Can manage members and day-to-day operation, not the workspace itself.
    Admin,

    /// Can work with invoices and statistics.
    Member,
}

impl WorkspaceRole {
    /// Numeric rank for comparisons. Higher rank = more authority.
    pub fn rank(&self) -> u8 {
        match self {
            WorkspaceRole::Owner => 2,
            WorkspaceRole::Admin => 1,
            WorkspaceRole::Member => 0,
        }
    }

    /// Lowercase storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceRole::Owner => "owner",
            WorkspaceRole::Admin => "admin",
            WorkspaceRole::Member => "member",
        }
    }

    /// Parses the lowercase storage form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(WorkspaceRole::Owner),
            "admin" => Some(WorkspaceRole::Admin),
            "member" => Some(WorkspaceRole::Member),
            _ => None,
        }
    }
}

impl std::fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
