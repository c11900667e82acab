//! Workspace command and query handlers.

mod accept_invite;
mod change_member_role;
mod create_organization;
mod delete_workspace;
mod invite_member;
mod list_workspaces;
mod remove_member;

pub use accept_invite::{AcceptInviteCommand, AcceptInviteHandler, AcceptInviteResult};
pub use change_member_role::{
    ChangeMemberRoleCommand, ChangeMemberRoleHandler, ChangeMemberRoleResult,
};
pub use create_organization::{
    CreateOrganizationCommand, CreateOrganizationHandler, CreateOrganizationResult,
};
pub use delete_workspace::{DeleteWorkspaceCommand, DeleteWorkspaceHandler};
pub use invite_member::{InviteMemberCommand, InviteMemberHandler, InviteMemberResult};
pub use list_workspaces::{ListWorkspacesHandler, ListWorkspacesQuery, ListWorkspacesResult};
pub use remove_member::{RemoveMemberCommand, RemoveMemberHandler};
