//! User account administration.
//!
//! Every mutation is admin-only; reading a single account is also open to
//! superusers. The first administrator is created through a one-time
//! bootstrap guarded by a configured token.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use sgi_core::{AppError, AppResult, NonEmptyString, Principal, UserId};
use sgi_domain::{AuditAction, EmailAddress, Role, validate_password};
use tracing::info;

use crate::{
    AreaRepository, AuditEvent, AuditRepository, PasswordHasher, RoleGate, UserRecord,
    UserRepository,
};

/// Default page size for user listings.
pub const DEFAULT_USER_PAGE_SIZE: usize = 50;

/// Input for creating a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Given name.
    pub nombre: String,
    /// Family name.
    pub apellido: String,
    /// National identity number.
    pub cedula: Option<String>,
    /// Contact phone number.
    pub telefono: Option<String>,
    /// Login email.
    pub email: String,
    /// Initial plaintext password.
    pub password: String,
    /// Role name.
    pub role: String,
    /// Home area name.
    pub area: String,
}

/// Partial update of a user account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserInput {
    /// New given name.
    pub nombre: Option<String>,
    /// New family name.
    pub apellido: Option<String>,
    /// New identity number.
    pub cedula: Option<String>,
    /// New phone number.
    pub telefono: Option<String>,
    /// New login email.
    pub email: Option<String>,
    /// New role name.
    pub role: Option<String>,
    /// New home area.
    pub area: Option<String>,
}

/// Repositories required by [`UserService`].
#[derive(Clone)]
pub struct UserServiceDependencies {
    /// User storage.
    pub users: Arc<dyn UserRepository>,
    /// Area catalog used to validate home areas.
    pub areas: Arc<dyn AreaRepository>,
    /// Password hashing.
    pub password_hasher: Arc<dyn PasswordHasher>,
    /// Audit writes.
    pub audit: Arc<dyn AuditRepository>,
}

/// Application service for user administration.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    area_repository: Arc<dyn AreaRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit_repository: Arc<dyn AuditRepository>,
    bootstrap_token: Option<String>,
}

impl UserService {
    /// Creates a new user service. Bootstrap is disabled without a token.
    #[must_use]
    pub fn new(dependencies: UserServiceDependencies, bootstrap_token: Option<String>) -> Self {
        Self {
            user_repository: dependencies.users,
            area_repository: dependencies.areas,
            password_hasher: dependencies.password_hasher,
            audit_repository: dependencies.audit,
            bootstrap_token: bootstrap_token.filter(|token| !token.trim().is_empty()),
        }
    }

    /// Creates the first administrator when the store holds no users.
    pub async fn bootstrap_admin(
        &self,
        provided_token: &str,
        mut input: CreateUserInput,
    ) -> AppResult<UserRecord> {
        let Some(expected) = self.bootstrap_token.as_deref() else {
            return Err(AppError::Forbidden("bootstrap is disabled".to_owned()));
        };

        if provided_token != expected {
            return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()));
        }

        if self.user_repository.count_users().await? > 0 {
            return Err(AppError::Conflict("bootstrap already completed".to_owned()));
        }

        input.role = Role::Admin.as_str().to_owned();
        let user = self.build_user(input).await?;
        self.user_repository.insert_user(&user).await?;
        info!(user_id = %user.id, "bootstrap administrator created");

        self.append_audit(&user.id.to_string(), AuditAction::UserCreated, &user, None)
            .await?;
        Ok(user)
    }

    /// Creates a user account.
    pub async fn create_user(
        &self,
        actor: &Principal,
        input: CreateUserInput,
    ) -> AppResult<UserRecord> {
        RoleGate::ADMIN_ONLY.check(actor, None)?;

        let user = self.build_user(input).await?;
        self.user_repository.insert_user(&user).await?;
        info!(user_id = %user.id, role = user.role.as_str(), area = %user.area, "user created");

        self.append_audit(
            &actor.user_id().to_string(),
            AuditAction::UserCreated,
            &user,
            Some(format!("role '{}' in area '{}'", user.role.as_str(), user.area)),
        )
        .await?;
        Ok(user)
    }

    /// Returns one user account.
    pub async fn get_user(&self, actor: &Principal, user_id: UserId) -> AppResult<UserRecord> {
        RoleGate::SUPERVISORS.check(actor, None)?;
        self.load_user(user_id).await
    }

    /// Lists user accounts.
    pub async fn list_users(
        &self,
        actor: &Principal,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> AppResult<Vec<UserRecord>> {
        RoleGate::ADMIN_ONLY.check(actor, None)?;

        self.user_repository
            .list_users(
                limit.unwrap_or(DEFAULT_USER_PAGE_SIZE).clamp(1, 200),
                offset.unwrap_or(0),
            )
            .await
    }

    /// Applies a partial update to a user account.
    pub async fn update_user(
        &self,
        actor: &Principal,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> AppResult<UserRecord> {
        RoleGate::ADMIN_ONLY.check(actor, None)?;

        let mut user = self.load_user(user_id).await?;
        if let Some(nombre) = input.nombre {
            user.nombre = NonEmptyString::new(nombre)?.into();
        }
        if let Some(apellido) = input.apellido {
            user.apellido = NonEmptyString::new(apellido)?.into();
        }
        if let Some(cedula) = input.cedula {
            user.cedula = optional_text(Some(cedula));
        }
        if let Some(telefono) = input.telefono {
            user.telefono = optional_text(Some(telefono));
        }
        if let Some(email) = input.email {
            user.email = EmailAddress::new(email)?.into();
        }
        if let Some(role) = input.role {
            user.role = Role::from_str(role.as_str())?;
        }
        if let Some(area) = input.area {
            user.area = self.canonical_area(area.as_str()).await?;
        }
        user.updated_at = Utc::now();

        self.user_repository.update_user(&user).await?;
        self.append_audit(
            &actor.user_id().to_string(),
            AuditAction::UserUpdated,
            &user,
            None,
        )
        .await?;
        Ok(user)
    }

    /// Deletes a user account. Administrators cannot delete themselves.
    pub async fn delete_user(&self, actor: &Principal, user_id: UserId) -> AppResult<()> {
        RoleGate::ADMIN_ONLY.check(actor, None)?;

        if actor.user_id() == user_id {
            return Err(AppError::Validation(
                "administrators cannot delete their own account".to_owned(),
            ));
        }

        let user = self.load_user(user_id).await?;
        self.user_repository.delete_user(user_id).await?;
        info!(user_id = %user_id, "user deleted");

        self.append_audit(
            &actor.user_id().to_string(),
            AuditAction::UserDeleted,
            &user,
            None,
        )
        .await
    }

    /// Replaces a user's password.
    pub async fn reset_password(
        &self,
        actor: &Principal,
        user_id: UserId,
        new_password: &str,
    ) -> AppResult<()> {
        RoleGate::ADMIN_ONLY.check(actor, None)?;
        validate_password(new_password)?;

        let user = self.load_user(user_id).await?;
        let password_hash = self.password_hasher.hash_password(new_password)?;
        self.user_repository
            .update_password(user_id, password_hash.as_str())
            .await?;

        self.append_audit(
            &actor.user_id().to_string(),
            AuditAction::UserPasswordReset,
            &user,
            None,
        )
        .await
    }

    async fn build_user(&self, input: CreateUserInput) -> AppResult<UserRecord> {
        let nombre = NonEmptyString::new(input.nombre)?;
        let apellido = NonEmptyString::new(input.apellido)?;
        let email = EmailAddress::new(input.email)?;
        let role = Role::from_str(input.role.as_str())?;
        validate_password(input.password.as_str())?;
        let area = self.canonical_area(input.area.as_str()).await?;

        if self
            .user_repository
            .find_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "a user with email '{}' already exists",
                email.as_str()
            )));
        }

        let password_hash = self.password_hasher.hash_password(input.password.as_str())?;
        let now = Utc::now();

        Ok(UserRecord {
            id: UserId::new(),
            nombre: nombre.into(),
            apellido: apellido.into(),
            cedula: optional_text(input.cedula),
            telefono: optional_text(input.telefono),
            email: email.into(),
            role,
            area,
            password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    async fn canonical_area(&self, name: &str) -> AppResult<String> {
        self.area_repository
            .find_area(name)
            .await?
            .map(String::from)
            .ok_or_else(|| AppError::Validation(format!("unknown area '{}'", name.trim())))
    }

    async fn load_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' not found")))
    }

    async fn append_audit(
        &self,
        subject: &str,
        action: AuditAction,
        user: &UserRecord,
        detail: Option<String>,
    ) -> AppResult<()> {
        self.audit_repository
            .record(AuditEvent {
                subject: subject.to_owned(),
                action,
                resource_type: "user".to_owned(),
                resource_id: user.id.to_string(),
                detail,
            })
            .await
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests;
