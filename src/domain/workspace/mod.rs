//! Workspace module - Tenancy, membership, and permissions.
//!
//! A workspace is the tenant boundary: either a user's personal space or a
//! shared organization. Roles are workspace-scoped; the permission matrix
//! is a pure function of the resolved role.

mod errors;
mod invite;
mod member;
mod permissions;
mod role;
mod workspace;

pub use errors::WorkspaceError;
pub use invite::{InviteStatus, WorkspaceInvite, INVITE_VALIDITY_DAYS};
pub use member::{MemberStatus, WorkspaceMember};
pub use permissions::{can_assign_role, can_invite_with_role, can_remove_member, RoleCapabilities};
pub use role::WorkspaceRole;
pub use workspace::{Workspace, WorkspaceKind};
