use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sgi_core::{AppResult, UserId};
use sgi_domain::Role;

/// User account as stored by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Given name.
    pub nombre: String,
    /// Family name.
    pub apellido: String,
    /// National identity number.
    pub cedula: Option<String>,
    /// Contact phone number.
    pub telefono: Option<String>,
    /// Canonical lowercased email, used as login.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Home area, always present in the area catalog.
    pub area: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Lists users ordered by email.
    async fn list_users(&self, limit: usize, offset: usize) -> AppResult<Vec<UserRecord>>;

    /// Returns the number of stored users.
    async fn count_users(&self) -> AppResult<u64>;

    /// Persists a new user. Duplicate emails fail with `Conflict`.
    async fn insert_user(&self, user: &UserRecord) -> AppResult<()>;

    /// Replaces profile fields, role and area of an existing user.
    async fn update_user(&self, user: &UserRecord) -> AppResult<()>;

    /// Replaces the password hash of an existing user.
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()>;

    /// Deletes an existing user.
    async fn delete_user(&self, user_id: UserId) -> AppResult<()>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
