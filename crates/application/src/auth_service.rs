//! Password login and bearer token handling.
//!
//! Access tokens carry the principal's claims and are verified on every
//! request without touching storage. Refresh tokens are signed with a
//! separate secret and re-read the account so role and area changes take
//! effect on the next refresh.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sgi_core::{AppError, AppResult, Principal, UserId};
use sgi_domain::EmailAddress;
use tracing::{debug, info};

use crate::{PasswordHasher, UserRecord, UserRepository};

/// Message returned for every failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

/// Purpose a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived bearer token.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

impl TokenKind {
    /// Returns the claim value for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

/// Claims carried by issued tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Account identifier.
    pub user_id: UserId,
    /// Role at issue time.
    pub role: String,
    /// Home area at issue time.
    pub area: String,
    /// Token purpose.
    pub kind: TokenKind,
}

impl TokenClaims {
    fn for_user(user: &UserRecord, kind: TokenKind) -> Self {
        Self {
            user_id: user.id,
            role: user.role.as_str().to_owned(),
            area: user.area.clone(),
            kind,
        }
    }
}

/// Signed token with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded token.
    pub token: String,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// Port for signing and verifying tokens.
pub trait AccessTokenCodec: Send + Sync {
    /// Signs claims into a token of the claims' kind.
    fn issue(&self, claims: &TokenClaims) -> AppResult<IssuedToken>;

    /// Verifies a token of the expected kind. Invalid tokens fail with `Unauthorized`.
    fn verify(&self, token: &str, expected: TokenKind) -> AppResult<TokenClaims>;
}

/// Tokens returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginTokens {
    /// Authenticated account.
    pub user_id: UserId,
    /// Access token.
    pub access: IssuedToken,
    /// Refresh token.
    pub refresh: IssuedToken,
}

/// Application service for authentication.
#[derive(Clone)]
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_codec: Arc<dyn AccessTokenCodec>,
}

impl AuthService {
    /// Creates a new authentication service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_codec: Arc<dyn AccessTokenCodec>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_codec,
        }
    }

    /// Authenticates with email and password.
    ///
    /// Unknown emails and wrong passwords fail identically, and a hash is
    /// computed on every path so response timing does not reveal which.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginTokens> {
        let user = match EmailAddress::new(email) {
            Ok(email) => self.user_repository.find_by_email(email.as_str()).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            let _ = self.password_hasher.hash_password(password);
            debug!("login failed for unknown email");
            return Err(AppError::Unauthorized(
                INVALID_CREDENTIALS_MESSAGE.to_owned(),
            ));
        };

        if !self
            .password_hasher
            .verify_password(password, user.password_hash.as_str())?
        {
            debug!(user_id = %user.id, "login failed with invalid password");
            return Err(AppError::Unauthorized(
                INVALID_CREDENTIALS_MESSAGE.to_owned(),
            ));
        }

        let access = self
            .token_codec
            .issue(&TokenClaims::for_user(&user, TokenKind::Access))?;
        let refresh = self
            .token_codec
            .issue(&TokenClaims::for_user(&user, TokenKind::Refresh))?;
        info!(user_id = %user.id, "user logged in");

        Ok(LoginTokens {
            user_id: user.id,
            access,
            refresh,
        })
    }

    /// Exchanges a refresh token for a new access token reflecting current account data.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<IssuedToken> {
        let claims = self.token_codec.verify(refresh_token, TokenKind::Refresh)?;
        let user = self
            .user_repository
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;

        self.token_codec
            .issue(&TokenClaims::for_user(&user, TokenKind::Access))
    }

    /// Resolves the principal carried by an access token.
    pub fn resolve_principal(&self, access_token: &str) -> AppResult<Principal> {
        let claims = self.token_codec.verify(access_token, TokenKind::Access)?;
        Ok(Principal::new(claims.user_id, claims.role, claims.area))
    }
}

#[cfg(test)]
mod tests;
