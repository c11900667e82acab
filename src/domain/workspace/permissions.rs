//! Workspace permission matrix.
//!
//! Static capabilities are a pure function of the resolved role; the
//! member-management decisions additionally compare the requester against
//! the target. Everything fails closed: an absent role can do nothing.

use serde::Serialize;

use super::WorkspaceRole;

/// Static capability table for a resolved role.
///
/// # Capability Matrix
///
/// | Capability | owner | admin | member | none |
/// |---|---|---|---|---|
/// | modify workspace settings | x | | | |
/// | delete workspace | x | | | |
/// | view billing | x | x | | |
/// | manage billing | x | | | |
/// | invite members | x | x | | |
/// | view invoices | x | x | x | |
/// | manage invoices | x | x | x | |
/// | manage email connections | x | x | | |
/// | view statistics | x | x | x | |
/// | view activity log | x | x | | |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleCapabilities {
    pub modify_settings: bool,
    pub delete_workspace: bool,
    pub view_billing: bool,
    pub manage_billing: bool,
    pub invite_members: bool,
    pub view_invoices: bool,
    pub manage_invoices: bool,
    pub manage_email_connections: bool,
    pub view_statistics: bool,
    pub view_activity_log: bool,
}

impl RoleCapabilities {
    /// Capabilities for a resolved role; `None` means no access at all.
    pub fn for_role(role: Option<WorkspaceRole>) -> Self {
        match role {
            Some(WorkspaceRole::Owner) => Self {
                modify_settings: true,
                delete_workspace: true,
                view_billing: true,
                manage_billing: true,
                invite_members: true,
                view_invoices: true,
                manage_invoices: true,
                manage_email_connections: true,
                view_statistics: true,
                view_activity_log: true,
            },
            Some(WorkspaceRole::Admin) => Self {
                modify_settings: false,
                delete_workspace: false,
                view_billing: true,
                manage_billing: false,
                invite_members: true,
                view_invoices: true,
                manage_invoices: true,
                manage_email_connections: true,
                view_statistics: true,
                view_activity_log: true,
            },
            Some(WorkspaceRole::Member) => Self {
                modify_settings: false,
                delete_workspace: false,
                view_billing: false,
                manage_billing: false,
                invite_members: false,
                view_invoices: true,
                manage_invoices: true,
                manage_email_connections: false,
                view_statistics: true,
                view_activity_log: false,
            },
            None => Self::none(),
        }
    }

    /// The all-deny row.
    pub fn none() -> Self {
        Self {
            modify_settings: false,
            delete_workspace: false,
            view_billing: false,
            manage_billing: false,
            invite_members: false,
            view_invoices: false,
            manage_invoices: false,
            manage_email_connections: false,
            view_statistics: false,
            view_activity_log: false,
        }
    }
}

/// May the requester remove the target from the workspace?
///
/// The designated owner can never be removed. Owners remove anyone else;
/// admins remove only plain members.
pub fn can_remove_member(
    requester: Option<WorkspaceRole>,
    target_is_owner: bool,
    target_role: WorkspaceRole,
) -> bool {
    if target_is_owner {
        return false;
    }
    match requester {
        Some(WorkspaceRole::Owner) => true,
        Some(WorkspaceRole::Admin) => target_role == WorkspaceRole::Member,
        _ => false,
    }
}

/// May the requester set `new_role` on the target?
///
/// Only the owner may hand out `owner`. Admins may adjust non-owner roles
/// on non-owner targets; they may never touch the designated owner.
pub fn can_assign_role(
    requester: Option<WorkspaceRole>,
    target_is_owner: bool,
    new_role: WorkspaceRole,
) -> bool {
    match requester {
        Some(WorkspaceRole::Owner) => true,
        Some(WorkspaceRole::Admin) => !target_is_owner && new_role != WorkspaceRole::Owner,
        _ => false,
    }
}

/// May the requester create an invitation proposing `proposed_role`?
pub fn can_invite_with_role(
    requester: Option<WorkspaceRole>,
    proposed_role: WorkspaceRole,
) -> bool {
    if !RoleCapabilities::for_role(requester).invite_members {
        return false;
    }
    if proposed_role == WorkspaceRole::Owner {
        return requester == Some(WorkspaceRole::Owner);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Option<WorkspaceRole>; 4] = [
        Some(WorkspaceRole::Owner),
        Some(WorkspaceRole::Admin),
        Some(WorkspaceRole::Member),
        None,
    ];

    // Static capability table

    #[test]
    fn owner_can_do_everything() {
        let caps = RoleCapabilities::for_role(Some(WorkspaceRole::Owner));
        assert!(caps.modify_settings);
        assert!(caps.delete_workspace);
        assert!(caps.manage_billing);
        assert!(caps.view_billing);
        assert!(caps.invite_members);
        assert!(caps.manage_email_connections);
        assert!(caps.view_activity_log);
    }

    #[test]
    fn admin_cannot_touch_workspace_or_billing_management() {
        let caps = RoleCapabilities::for_role(Some(WorkspaceRole::Admin));
        assert!(!caps.modify_settings);
        assert!(!caps.delete_workspace);
        assert!(!caps.manage_billing);
        assert!(caps.view_billing);
        assert!(caps.invite_members);
        assert!(caps.manage_email_connections);
    }

    #[test]
    fn member_handles_invoices_only() {
        let caps = RoleCapabilities::for_role(Some(WorkspaceRole::Member));
        assert!(caps.view_invoices);
        assert!(caps.manage_invoices);
        assert!(caps.view_statistics);
        assert!(!caps.view_billing);
        assert!(!caps.invite_members);
        assert!(!caps.manage_email_connections);
        assert!(!caps.view_activity_log);
    }

    #[test]
    fn no_role_means_no_capabilities() {
        let caps = RoleCapabilities::for_role(None);
        assert_eq!(caps, RoleCapabilities::none());
        assert!(!caps.view_invoices);
        assert!(!caps.view_statistics);
    }

    #[test]
    fn invite_capability_is_owner_and_admin_only() {
        assert!(RoleCapabilities::for_role(Some(WorkspaceRole::Owner)).invite_members);
        assert!(RoleCapabilities::for_role(Some(WorkspaceRole::Admin)).invite_members);
        assert!(!RoleCapabilities::for_role(Some(WorkspaceRole::Member)).invite_members);
        assert!(!RoleCapabilities::for_role(None).invite_members);
    }

    // Member removal

    #[test]
    fn nobody_removes_the_designated_owner() {
        for requester in ALL_ROLES {
            for target_role in [WorkspaceRole::Owner, WorkspaceRole::Admin, WorkspaceRole::Member] {
                assert!(
                    !can_remove_member(requester, true, target_role),
                    "requester {:?} removed the owner",
                    requester
                );
            }
        }
    }

    #[test]
    fn owner_removes_admins_and_members() {
        assert!(can_remove_member(Some(WorkspaceRole::Owner), false, WorkspaceRole::Admin));
        assert!(can_remove_member(Some(WorkspaceRole::Owner), false, WorkspaceRole::Member));
    }

    #[test]
    fn admin_removes_members_but_not_admins() {
        assert!(can_remove_member(Some(WorkspaceRole::Admin), false, WorkspaceRole::Member));
        assert!(!can_remove_member(Some(WorkspaceRole::Admin), false, WorkspaceRole::Admin));
    }

    #[test]
    fn members_and_outsiders_remove_nobody() {
        assert!(!can_remove_member(Some(WorkspaceRole::Member), false, WorkspaceRole::Member));
        assert!(!can_remove_member(None, false, WorkspaceRole::Member));
    }

    // Role assignment

    #[test]
    fn only_owner_assigns_owner() {
        for requester in ALL_ROLES {
            let allowed = can_assign_role(requester, false, WorkspaceRole::Owner);
            assert_eq!(allowed, requester == Some(WorkspaceRole::Owner));
        }
    }

    #[test]
    fn admin_assigns_non_owner_roles_to_non_owner_targets() {
        assert!(can_assign_role(Some(WorkspaceRole::Admin), false, WorkspaceRole::Admin));
        assert!(can_assign_role(Some(WorkspaceRole::Admin), false, WorkspaceRole::Member));
    }

    #[test]
    fn admin_never_modifies_the_owner() {
        assert!(!can_assign_role(Some(WorkspaceRole::Admin), true, WorkspaceRole::Member));
        assert!(!can_assign_role(Some(WorkspaceRole::Admin), true, WorkspaceRole::Admin));
    }

    #[test]
    fn members_and_outsiders_assign_nothing() {
        assert!(!can_assign_role(Some(WorkspaceRole::Member), false, WorkspaceRole::Member));
        assert!(!can_assign_role(None, false, WorkspaceRole::Member));
    }

    // Invites

    #[test]
    fn proposing_owner_is_owner_only() {
        assert!(can_invite_with_role(Some(WorkspaceRole::Owner), WorkspaceRole::Owner));
        assert!(!can_invite_with_role(Some(WorkspaceRole::Admin), WorkspaceRole::Owner));
    }

    #[test]
    fn owner_and_admin_propose_lower_roles() {
        for proposed in [WorkspaceRole::Admin, WorkspaceRole::Member] {
            assert!(can_invite_with_role(Some(WorkspaceRole::Owner), proposed));
            assert!(can_invite_with_role(Some(WorkspaceRole::Admin), proposed));
        }
    }

    #[test]
    fn members_and_outsiders_invite_nobody() {
        for proposed in [WorkspaceRole::Owner, WorkspaceRole::Admin, WorkspaceRole::Member] {
            assert!(!can_invite_with_role(Some(WorkspaceRole::Member), proposed));
            assert!(!can_invite_with_role(None, proposed));
        }
    }
}
