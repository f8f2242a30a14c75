use uuid::Uuid;

use crate::error::AppError;

use super::Role;

/// Everything a requester may attempt. Each action maps to exactly one row of
/// [`POLICIES`]; services consult the table instead of hand-rolling role
/// checks per handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
    ViewHistory,
    CreateCoupon,
    DeleteAccount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Role check alone decides.
    Any,
    /// Requester must own the resource; admins override.
    OwnerOrAdmin,
    /// Requester must be the target user; admins override.
    SelfOrAdmin,
}

pub struct Policy {
    pub action: Action,
    pub roles: &'static [Role],
    pub scope: Scope,
}

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Organizer, Role::Attendee];

pub const POLICIES: &[Policy] = &[
    Policy {
        action: Action::CreateEvent,
        roles: &[Role::Organizer],
        scope: Scope::Any,
    },
    Policy {
        action: Action::UpdateEvent,
        roles: &[Role::Organizer, Role::Admin],
        scope: Scope::OwnerOrAdmin,
    },
    Policy {
        action: Action::DeleteEvent,
        roles: &[Role::Organizer, Role::Admin],
        scope: Scope::OwnerOrAdmin,
    },
    Policy {
        action: Action::ViewHistory,
        roles: &[Role::Attendee],
        scope: Scope::Any,
    },
    Policy {
        action: Action::CreateCoupon,
        roles: &[Role::Admin],
        scope: Scope::Any,
    },
    Policy {
        action: Action::DeleteAccount,
        roles: ALL_ROLES,
        scope: Scope::SelfOrAdmin,
    },
];

// Unlisted actions deny everyone rather than panic.
static DENY_ALL: Policy = Policy {
    action: Action::DeleteAccount,
    roles: &[],
    scope: Scope::Any,
};

fn policy(action: Action) -> &'static Policy {
    POLICIES
        .iter()
        .find(|policy| policy.action == action)
        .unwrap_or(&DENY_ALL)
}

/// Role gate. Runs before any resource lookup, so e.g. an attendee probing
/// event ids gets 403 whether or not the event exists.
pub fn require_role(action: Action, role: &Role) -> Result<(), AppError> {
    if policy(action).roles.contains(role) {
        return Ok(());
    }
    Err(AppError::forbidden("Missing required role"))
}

/// Ownership gate, applied after the resource is known to exist.
pub fn require_scope(
    action: Action,
    requester_id: &Uuid,
    requester_role: &Role,
    owner_id: &Uuid,
) -> Result<(), AppError> {
    match policy(action).scope {
        Scope::Any => Ok(()),
        Scope::OwnerOrAdmin | Scope::SelfOrAdmin => {
            if requester_role == &Role::Admin || requester_id == owner_id {
                Ok(())
            } else {
                Err(AppError::forbidden("Not allowed to modify this resource"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::{auth::Role, error::AppError};

    use super::{Action, require_role, require_scope};

    #[test]
    fn only_organizers_create_events() {
        assert!(require_role(Action::CreateEvent, &Role::Organizer).is_ok());
        assert!(require_role(Action::CreateEvent, &Role::Attendee).is_err());
        assert!(require_role(Action::CreateEvent, &Role::Admin).is_err());
    }

    #[test]
    fn attendees_never_mutate_events() {
        for action in [Action::UpdateEvent, Action::DeleteEvent] {
            let err = require_role(action, &Role::Attendee).expect_err("should be forbidden");
            assert!(matches!(err, AppError::Forbidden(_)));
        }
    }

    #[test]
    fn history_is_attendee_only() {
        assert!(require_role(Action::ViewHistory, &Role::Attendee).is_ok());
        assert!(require_role(Action::ViewHistory, &Role::Organizer).is_err());
        assert!(require_role(Action::ViewHistory, &Role::Admin).is_err());
    }

    #[test]
    fn coupons_are_admin_only() {
        assert!(require_role(Action::CreateCoupon, &Role::Admin).is_ok());
        assert!(require_role(Action::CreateCoupon, &Role::Organizer).is_err());
        assert!(require_role(Action::CreateCoupon, &Role::Attendee).is_err());
    }

    #[test]
    fn owner_scope_admits_owner_and_admin_only() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(require_scope(Action::UpdateEvent, &owner, &Role::Organizer, &owner).is_ok());
        assert!(require_scope(Action::UpdateEvent, &other, &Role::Admin, &owner).is_ok());
        assert!(require_scope(Action::UpdateEvent, &other, &Role::Organizer, &owner).is_err());
    }

    #[test]
    fn account_deletion_is_self_or_admin() {
        let target = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(require_role(Action::DeleteAccount, &Role::Attendee).is_ok());
        assert!(require_scope(Action::DeleteAccount, &target, &Role::Attendee, &target).is_ok());
        assert!(require_scope(Action::DeleteAccount, &other, &Role::Admin, &target).is_ok());
        assert!(require_scope(Action::DeleteAccount, &other, &Role::Organizer, &target).is_err());
    }
}
