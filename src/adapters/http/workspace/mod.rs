//! HTTP adapter for workspace endpoints.
//!
//! - `GET    /api/workspaces` - List workspaces (lazily creates personal)
//! - `GET    /api/workspaces/:id/permissions` - Caller's role and capabilities
//!   (`:id` may be the `"personal"` sentinel)
//! - `POST   /api/workspaces` - Create an organization
//! - `DELETE /api/workspaces/:id` - Delete a workspace (cascades)
//! - `POST   /api/workspaces/:id/invites` - Invite a member
//! - `POST   /api/invites/:token/accept` - Accept an invitation
//! - `DELETE /api/workspaces/:id/members/:user_id` - Remove a member
//! - `PATCH  /api/workspaces/:id/members/:user_id` - Change a role

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{invite_routes, workspace_routes};
