//! Area-scoped access decisions for protected records.
//!
//! Every request that names a record runs through [`AccessControlService`]
//! before any role check or CRUD work. The service reads the record's area and
//! any temporary grant, never writes, and hands back an explicit
//! [`AuthorizationContext`] that later gates consume.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sgi_core::{AccessDenial, AppError, AppResult, Principal, UserId};
use sgi_domain::{EntityKind, EntityRef, TemporaryGrant};
use tracing::{debug, info};
use uuid::Uuid;

mod role_gate;

pub use role_gate::RoleGate;

/// Message returned when a referenced record does not exist.
pub const ENTITY_NOT_FOUND_MESSAGE: &str = "Entity not found";

/// Message returned when area scoping refuses a principal.
pub const AREA_DENIED_MESSAGE: &str = "You do not have access to this resource";

/// Repository port for the reads the decision engine performs.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Returns the stored area of one record, or `None` when it does not exist.
    async fn find_entity_area(&self, entity: EntityRef) -> AppResult<Option<String>>;

    /// Finds a grant for `user_id` on `entity` whose expiry is after `now`.
    async fn find_active_temporary_grant(
        &self,
        user_id: UserId,
        entity: EntityRef,
        now: DateTime<Utc>,
    ) -> AppResult<Option<TemporaryGrant>>;
}

/// What a request is about to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTarget {
    /// One existing record.
    Entity(EntityRef),
    /// A whole collection, for create and list operations.
    Collection(EntityKind),
}

impl AccessTarget {
    /// Returns the targeted entity kind.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Entity(entity) => entity.kind,
            Self::Collection(kind) => *kind,
        }
    }
}

/// Rule that admitted the principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessBasis {
    /// Admin bypass.
    Admin,
    /// An active temporary grant.
    TemporaryGrant {
        /// Grant identifier.
        grant_id: Uuid,
        /// Grant expiry.
        expires_at: DateTime<Utc>,
    },
    /// Principal and record share an area.
    HomeArea,
    /// Collection-level request; area scoping is applied by the collection operation.
    Collection,
}

/// Record resolved by the decision engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedEntity {
    /// Record identifier.
    pub id: Uuid,
    /// Stored record area.
    pub area: String,
}

/// Outcome of a successful access decision, threaded to later gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationContext {
    principal: Principal,
    entity_kind: EntityKind,
    entity: Option<AuthorizedEntity>,
    basis: AccessBasis,
}

impl AuthorizationContext {
    /// Returns the authenticated principal.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Returns the targeted entity kind.
    #[must_use]
    pub fn entity_kind(&self) -> EntityKind {
        self.entity_kind
    }

    /// Returns the resolved record, absent for collection requests.
    #[must_use]
    pub fn entity(&self) -> Option<&AuthorizedEntity> {
        self.entity.as_ref()
    }

    /// Returns the rule that admitted the principal.
    #[must_use]
    pub fn basis(&self) -> AccessBasis {
        self.basis
    }

    /// Returns the typed reference of the resolved record.
    #[must_use]
    pub fn entity_ref(&self) -> Option<EntityRef> {
        self.entity
            .as_ref()
            .map(|entity| EntityRef::new(self.entity_kind, entity.id))
    }
}

/// Decision engine combining principal, record area and temporary grants.
#[derive(Clone)]
pub struct AccessControlService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AccessControlService {
    /// Creates a new decision engine.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Decides access at the current wall-clock time.
    pub async fn authorize(
        &self,
        principal: &Principal,
        target: AccessTarget,
    ) -> AppResult<AuthorizationContext> {
        self.authorize_at(principal, target, Utc::now()).await
    }

    /// Decides access at `now`.
    ///
    /// Rules run in order and the first match wins: missing record, admin
    /// bypass, active grant, home area, denial.
    pub async fn authorize_at(
        &self,
        principal: &Principal,
        target: AccessTarget,
        now: DateTime<Utc>,
    ) -> AppResult<AuthorizationContext> {
        let entity = match target {
            AccessTarget::Collection(kind) => {
                return Ok(AuthorizationContext {
                    principal: principal.clone(),
                    entity_kind: kind,
                    entity: None,
                    basis: AccessBasis::Collection,
                });
            }
            AccessTarget::Entity(entity) => entity,
        };

        let Some(area) = self.repository.find_entity_area(entity).await? else {
            return Err(AppError::NotFound(ENTITY_NOT_FOUND_MESSAGE.to_owned()));
        };

        let basis = self.resolve_basis(principal, entity, &area, now).await?;

        Ok(AuthorizationContext {
            principal: principal.clone(),
            entity_kind: entity.kind,
            entity: Some(AuthorizedEntity {
                id: entity.id,
                area,
            }),
            basis,
        })
    }

    /// Returns the stored area of a record, failing with `NotFound` when it is missing.
    pub async fn require_entity_area(&self, entity: EntityRef) -> AppResult<String> {
        self.repository
            .find_entity_area(entity)
            .await?
            .ok_or_else(|| AppError::NotFound(ENTITY_NOT_FOUND_MESSAGE.to_owned()))
    }

    async fn resolve_basis(
        &self,
        principal: &Principal,
        entity: EntityRef,
        area: &str,
        now: DateTime<Utc>,
    ) -> AppResult<AccessBasis> {
        if principal.is_admin() {
            return Ok(AccessBasis::Admin);
        }

        let grant = self
            .repository
            .find_active_temporary_grant(principal.user_id(), entity, now)
            .await?
            .filter(|grant| grant.admits(principal.user_id(), entity, now));

        if let Some(grant) = grant {
            info!(
                user_id = %principal.user_id(),
                entity = %entity,
                grant_id = %grant.id,
                "temporary access grant used"
            );
            return Ok(AccessBasis::TemporaryGrant {
                grant_id: grant.id,
                expires_at: grant.expires_at,
            });
        }

        if principal.area() == area {
            return Ok(AccessBasis::HomeArea);
        }

        debug!(
            user_id = %principal.user_id(),
            entity = %entity,
            principal_area = principal.area(),
            entity_area = area,
            "area access denied"
        );
        Err(AppError::AreaForbidden(AccessDenial {
            message: AREA_DENIED_MESSAGE.to_owned(),
            entity_area: area.to_owned(),
            entity_name: entity.kind.display_name().to_owned(),
        }))
    }
}
