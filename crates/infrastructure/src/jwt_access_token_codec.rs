//! HS256 JWT implementation of the token codec port.
//!
//! Access and refresh tokens are signed with distinct secrets, so a refresh
//! token never verifies as an access token even before the `token_type`
//! claim is checked.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sgi_application::{AccessTokenCodec, IssuedToken, TokenClaims, TokenKind};
use sgi_core::{AppError, AppResult, UserId};
use uuid::Uuid;

/// Minimum accepted secret length in bytes.
pub const MIN_TOKEN_SECRET_LENGTH: usize = 32;

/// Secrets and lifetimes for issued tokens.
#[derive(Clone)]
pub struct JwtSettings {
    /// Secret for access tokens.
    pub access_secret: String,
    /// Secret for refresh tokens.
    pub refresh_secret: String,
    /// Access token lifetime.
    pub access_ttl: Duration,
    /// Refresh token lifetime.
    pub refresh_ttl: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    user_id: Uuid,
    role: String,
    area: String,
    token_type: String,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// Token codec signing HS256 JWTs.
#[derive(Clone)]
pub struct JwtAccessTokenCodec {
    access: SigningKeys,
    refresh: SigningKeys,
}

impl JwtAccessTokenCodec {
    /// Creates a codec, rejecting short or shared secrets.
    pub fn new(settings: JwtSettings) -> AppResult<Self> {
        for (name, secret) in [
            ("access", settings.access_secret.as_str()),
            ("refresh", settings.refresh_secret.as_str()),
        ] {
            if secret.len() < MIN_TOKEN_SECRET_LENGTH {
                return Err(AppError::Validation(format!(
                    "{name} token secret must be at least {MIN_TOKEN_SECRET_LENGTH} characters"
                )));
            }
        }
        if settings.access_secret == settings.refresh_secret {
            return Err(AppError::Validation(
                "access and refresh token secrets must differ".to_owned(),
            ));
        }

        Ok(Self {
            access: SigningKeys::new(settings.access_secret.as_str(), settings.access_ttl),
            refresh: SigningKeys::new(settings.refresh_secret.as_str(), settings.refresh_ttl),
        })
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    fn issue_at(&self, claims: &TokenClaims, now: DateTime<Utc>) -> AppResult<IssuedToken> {
        let keys = self.keys(claims.kind);
        let expires_at = now + keys.ttl;
        let payload = JwtClaims {
            user_id: claims.user_id.as_uuid(),
            role: claims.role.clone(),
            area: claims.area.clone(),
            token_type: claims.kind.as_str().to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &payload, &keys.encoding)
            .map_err(|error| AppError::Internal(format!("failed to sign token: {error}")))?;

        Ok(IssuedToken { token, expires_at })
    }
}

impl AccessTokenCodec for JwtAccessTokenCodec {
    fn issue(&self, claims: &TokenClaims) -> AppResult<IssuedToken> {
        self.issue_at(claims, Utc::now())
    }

    fn verify(&self, token: &str, expected: TokenKind) -> AppResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let decoded = decode::<JwtClaims>(token, &self.keys(expected).decoding, &validation)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized("token expired".to_owned()),
                _ => AppError::Unauthorized("invalid token".to_owned()),
            })?;

        let claims = decoded.claims;
        if claims.token_type != expected.as_str() {
            return Err(AppError::Unauthorized("invalid token".to_owned()));
        }

        Ok(TokenClaims {
            user_id: UserId::from_uuid(claims.user_id),
            role: claims.role,
            area: claims.area,
            kind: expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sgi_application::{AccessTokenCodec, TokenClaims, TokenKind};
    use sgi_core::{AppError, UserId};

    use super::{JwtAccessTokenCodec, JwtSettings};

    fn settings() -> JwtSettings {
        JwtSettings {
            access_secret: "access-secret-access-secret-access-secret".to_owned(),
            refresh_secret: "refresh-secret-refresh-secret-refresh-secret".to_owned(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::hours(168),
        }
    }

    fn claims(kind: TokenKind) -> TokenClaims {
        TokenClaims {
            user_id: UserId::new(),
            role: "analyst".to_owned(),
            area: "CI2 ESPECIAL".to_owned(),
            kind,
        }
    }

    #[test]
    fn access_token_carries_principal_claims() {
        let Ok(codec) = JwtAccessTokenCodec::new(settings()) else {
            panic!("valid settings");
        };
        let issued_claims = claims(TokenKind::Access);

        let Ok(issued) = codec.issue(&issued_claims) else {
            panic!("signing succeeds");
        };

        assert!(matches!(
            codec.verify(issued.token.as_str(), TokenKind::Access),
            Ok(ref verified) if *verified == issued_claims
        ));
    }

    #[test]
    fn refresh_token_is_rejected_where_access_is_expected() {
        let Ok(codec) = JwtAccessTokenCodec::new(settings()) else {
            panic!("valid settings");
        };
        let Ok(issued) = codec.issue(&claims(TokenKind::Refresh)) else {
            panic!("signing succeeds");
        };

        assert!(matches!(
            codec.verify(issued.token.as_str(), TokenKind::Access),
            Err(AppError::Unauthorized(_))
        ));
        assert!(
            codec
                .verify(issued.token.as_str(), TokenKind::Refresh)
                .is_ok()
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let Ok(codec) = JwtAccessTokenCodec::new(settings()) else {
            panic!("valid settings");
        };
        let Ok(issued) = codec.issue_at(&claims(TokenKind::Access), Utc::now() - Duration::hours(1))
        else {
            panic!("signing succeeds");
        };

        assert!(matches!(
            codec.verify(issued.token.as_str(), TokenKind::Access),
            Err(AppError::Unauthorized(ref message)) if message == "token expired"
        ));
    }

    #[test]
    fn short_or_shared_secrets_are_rejected() {
        let mut short = settings();
        short.access_secret = "too-short".to_owned();
        assert!(JwtAccessTokenCodec::new(short).is_err());

        let mut shared = settings();
        shared.refresh_secret = shared.access_secret.clone();
        assert!(JwtAccessTokenCodec::new(shared).is_err());
    }
}
