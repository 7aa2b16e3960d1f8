use sgi_core::{AccessDenial, AppError, AppResult, Principal};

use super::AuthorizationContext;

const ROLE_DENIED_MESSAGE: &str = "You don't have permission to access this resource";

/// Per-operation role whitelist.
///
/// Matching ignores ASCII case on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGate {
    allowed: &'static [&'static str],
}

impl RoleGate {
    /// Gate for administrator-only operations.
    pub const ADMIN_ONLY: Self = Self::new(&["admin"]);

    /// Gate for operations open to admins and superusers.
    pub const SUPERVISORS: Self = Self::new(&["admin", "superuser"]);

    /// Creates a gate from a role whitelist.
    #[must_use]
    pub const fn new(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }

    /// Returns the whitelisted roles.
    #[must_use]
    pub fn allowed(&self) -> &'static [&'static str] {
        self.allowed
    }

    /// Returns whether `role` is whitelisted.
    #[must_use]
    pub fn allows(&self, role: &str) -> bool {
        self.allowed
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(role.trim()))
    }

    /// Rejects a principal whose role is not whitelisted.
    ///
    /// When `context` carries a resolved record, the denial names its area and kind.
    pub fn check(
        &self,
        principal: &Principal,
        context: Option<&AuthorizationContext>,
    ) -> AppResult<()> {
        if self.allows(principal.role()) {
            return Ok(());
        }

        let resolved = context.and_then(|context| {
            context
                .entity()
                .map(|entity| (entity.area.clone(), context.entity_kind().display_name()))
        });

        Err(match resolved {
            Some((entity_area, entity_name)) => AppError::AreaForbidden(AccessDenial {
                message: ROLE_DENIED_MESSAGE.to_owned(),
                entity_area,
                entity_name: entity_name.to_owned(),
            }),
            None => AppError::Forbidden(ROLE_DENIED_MESSAGE.to_owned()),
        })
    }
}
