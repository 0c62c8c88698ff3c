//! Authorization decisions for every tenant-scoped request.
//!
//! The engine is a pure function of `(principal, action, resource)`: it keeps
//! no state between calls and never touches the store. Handlers describe the
//! resource they are about to act on and convert a [`Denial`] into an HTTP
//! error at the boundary.
//!
//! Rules are evaluated in a fixed order:
//! 1. no principal → `Unauthenticated`
//! 2. admin-only action, non-admin caller → `InsufficientRole`
//! 3. resource in another tenant → `TenantMismatch` (applies to admins too)
//! 4. note read/update/delete by anyone but the creator → `NotOwner`
//! 5. admin deleting their own account → `CannotDeleteSelf`

use crate::domain::models::auth::Principal;
use crate::error::AppError;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListNotes,
    CreateNote,
    ReadNote,
    UpdateNote,
    DeleteNote,
    ListUsers,
    InviteUser,
    ReadUser,
    UpdateUser,
    DeleteUser,
    ReadTenant,
    UpgradeTenant,
}

impl Action {
    pub fn requires_admin(self) -> bool {
        matches!(
            self,
            Action::ListUsers
                | Action::InviteUser
                | Action::ReadUser
                | Action::UpdateUser
                | Action::DeleteUser
                | Action::UpgradeTenant
        )
    }

    /// Note reads and writes are scoped to the creator, not just the tenant.
    pub fn is_owner_scoped(self) -> bool {
        matches!(self, Action::ReadNote | Action::UpdateNote | Action::DeleteNote)
    }

    /// Item-level actions whose denials must look exactly like a missing record.
    pub fn conceals_existence(self) -> bool {
        matches!(
            self,
            Action::ReadNote
                | Action::UpdateNote
                | Action::DeleteNote
                | Action::ReadUser
                | Action::UpdateUser
                | Action::DeleteUser
        )
    }

    fn not_found_message(self) -> &'static str {
        match self {
            Action::ReadUser | Action::UpdateUser | Action::DeleteUser => "User not found",
            _ => "Note not found",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    InsufficientRole,
    TenantMismatch,
    CannotDeleteSelf,
    NotOwner,
    LimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// How a request names the tenant that owns the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantRef<'a> {
    Id(&'a str),
    Slug(&'a str),
}

/// What the caller is acting on. `tenant: None` means a collection inside
/// the caller's own tenant (list/create), which is implicitly in scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resource<'a> {
    pub tenant: Option<TenantRef<'a>>,
    pub owner_id: Option<&'a str>,
}

impl<'a> Resource<'a> {
    pub fn own_tenant() -> Self {
        Self::default()
    }

    pub fn tenant_slug(slug: &'a str) -> Self {
        Self { tenant: Some(TenantRef::Slug(slug)), owner_id: None }
    }

    /// A note or user record: `owner_id` is the note creator or the target user.
    pub fn record(tenant_id: &'a str, owner_id: &'a str) -> Self {
        Self { tenant: Some(TenantRef::Id(tenant_id)), owner_id: Some(owner_id) }
    }

    /// A user addressed by id before it has been loaded from the store.
    pub fn user_target(user_id: &'a str) -> Self {
        Self { tenant: None, owner_id: Some(user_id) }
    }
}

pub fn authorize(principal: Option<&Principal>, action: Action, resource: Resource<'_>) -> Decision {
    let Some(principal) = principal else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    if action.requires_admin() && !principal.is_admin() {
        return Decision::Deny(DenyReason::InsufficientRole);
    }

    let same_tenant = match resource.tenant {
        None => true,
        Some(TenantRef::Id(id)) => id == principal.tenant_id,
        Some(TenantRef::Slug(slug)) => slug == principal.tenant_slug,
    };
    if !same_tenant {
        return Decision::Deny(DenyReason::TenantMismatch);
    }

    if action.is_owner_scoped() && resource.owner_id.is_some_and(|owner| owner != principal.user_id) {
        return Decision::Deny(DenyReason::NotOwner);
    }

    if action == Action::DeleteUser && resource.owner_id == Some(principal.user_id.as_str()) {
        return Decision::Deny(DenyReason::CannotDeleteSelf);
    }

    Decision::Allow
}

/// A denied decision together with the action it was made for, which is what
/// the HTTP boundary needs to pick the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub action: Action,
    pub reason: DenyReason,
}

/// Runs [`authorize`] and hands back the principal on success.
pub fn enforce<'p>(
    principal: Option<&'p Principal>,
    action: Action,
    resource: Resource<'_>,
) -> Result<&'p Principal, Denial> {
    match (authorize(principal, action, resource), principal) {
        (Decision::Allow, Some(p)) => Ok(p),
        (Decision::Deny(reason), _) => {
            if reason != DenyReason::Unauthenticated {
                warn!(
                    action = %action,
                    reason = ?reason,
                    user_id = principal.map(|p| p.user_id.as_str()).unwrap_or(""),
                    "authorization denied"
                );
            }
            Err(Denial { action, reason })
        }
        (Decision::Allow, None) => Err(Denial { action, reason: DenyReason::Unauthenticated }),
    }
}

impl From<Denial> for AppError {
    fn from(denial: Denial) -> Self {
        let Denial { action, reason } = denial;
        match reason {
            DenyReason::Unauthenticated => AppError::Unauthorized,
            DenyReason::InsufficientRole => AppError::Forbidden("Forbidden. Admin access required.".into()),
            DenyReason::TenantMismatch if action.conceals_existence() => {
                AppError::NotFound(action.not_found_message().into())
            }
            DenyReason::TenantMismatch => match action {
                Action::UpgradeTenant => AppError::Forbidden("Cannot upgrade other tenants".into()),
                _ => AppError::Forbidden("Forbidden. Cannot access other tenants.".into()),
            },
            DenyReason::NotOwner => AppError::NotFound(action.not_found_message().into()),
            DenyReason::CannotDeleteSelf => AppError::Validation("Cannot delete your own account".into()),
            DenyReason::LimitReached => AppError::LimitReached,
        }
    }
}
