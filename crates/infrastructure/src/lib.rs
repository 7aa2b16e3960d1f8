//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_store;
mod jwt_access_token_codec;
mod postgres_area_repository;
mod postgres_audit_trail;
mod postgres_authorization_repository;
mod postgres_errors;
mod postgres_paging;
mod postgres_record_repository;
mod postgres_temporary_grant_repository;
#[cfg(test)]
mod postgres_test_support;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_store::InMemoryStore;
pub use jwt_access_token_codec::{JwtAccessTokenCodec, JwtSettings, MIN_TOKEN_SECRET_LENGTH};
pub use postgres_area_repository::PostgresAreaRepository;
pub use postgres_audit_trail::PostgresAuditTrail;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_record_repository::PostgresRecordRepository;
pub use postgres_temporary_grant_repository::PostgresTemporaryGrantRepository;
pub use postgres_user_repository::PostgresUserRepository;
