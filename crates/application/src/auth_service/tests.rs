use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sgi_core::{AppError, AppResult, UserId};
use sgi_domain::Role;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{PasswordHasher, UserRecord, UserRepository};

use super::{
    AccessTokenCodec, AuthService, INVALID_CREDENTIALS_MESSAGE, IssuedToken, TokenClaims,
    TokenKind,
};

#[derive(Default)]
struct FakeUserRepository {
    users: Mutex<HashMap<UserId, UserRecord>>,
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn list_users(&self, _limit: usize, _offset: usize) -> AppResult<Vec<UserRecord>> {
        Ok(Vec::new())
    }

    async fn count_users(&self) -> AppResult<u64> {
        Ok(self.users.lock().await.len() as u64)
    }

    async fn insert_user(&self, user: &UserRecord) -> AppResult<()> {
        self.users.lock().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &UserRecord) -> AppResult<()> {
        self.users.lock().await.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_password(&self, _user_id: UserId, _password_hash: &str) -> AppResult<()> {
        Ok(())
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.users.lock().await.remove(&user_id);
        Ok(())
    }
}

#[derive(Default)]
struct CountingPasswordHasher {
    hashes: AtomicUsize,
}

impl PasswordHasher for CountingPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

/// Encodes claims as `kind|user_id|role|area` without signing.
struct PlainTokenCodec;

impl AccessTokenCodec for PlainTokenCodec {
    fn issue(&self, claims: &TokenClaims) -> AppResult<IssuedToken> {
        Ok(IssuedToken {
            token: format!(
                "{}|{}|{}|{}",
                claims.kind.as_str(),
                claims.user_id,
                claims.role,
                claims.area
            ),
            expires_at: Utc::now() + Duration::minutes(15),
        })
    }

    fn verify(&self, token: &str, expected: TokenKind) -> AppResult<TokenClaims> {
        let invalid = || AppError::Unauthorized("invalid token".to_owned());
        let parts: Vec<&str> = token.split('|').collect();
        let [kind, user_id, role, area] = parts.as_slice() else {
            return Err(invalid());
        };
        if *kind != expected.as_str() {
            return Err(invalid());
        }

        Ok(TokenClaims {
            user_id: UserId::from_uuid(Uuid::from_str(user_id).map_err(|_| invalid())?),
            role: (*role).to_owned(),
            area: (*area).to_owned(),
            kind: expected,
        })
    }
}

async fn seeded_service() -> (
    AuthService,
    Arc<FakeUserRepository>,
    Arc<CountingPasswordHasher>,
    UserRecord,
) {
    let repository = Arc::new(FakeUserRepository::default());
    let hasher = Arc::new(CountingPasswordHasher::default());
    let now = Utc::now();
    let user = UserRecord {
        id: UserId::new(),
        nombre: "Maria".to_owned(),
        apellido: "Gil".to_owned(),
        cedula: None,
        telefono: None,
        email: "maria@sgi.test".to_owned(),
        role: Role::Analyst,
        area: "CI2".to_owned(),
        password_hash: "hashed:correct-horse-battery".to_owned(),
        created_at: now,
        updated_at: now,
    };
    repository.users.lock().await.insert(user.id, user.clone());

    let service = AuthService::new(
        repository.clone(),
        hasher.clone(),
        Arc::new(PlainTokenCodec),
    );
    (service, repository, hasher, user)
}

#[tokio::test]
async fn login_issues_tokens_carrying_role_and_area() {
    let (service, _, _, user) = seeded_service().await;

    let tokens = service.login("MARIA@sgi.test", "correct-horse-battery").await;
    let Ok(tokens) = tokens else {
        panic!("valid credentials should log in");
    };

    assert_eq!(tokens.user_id, user.id);
    let principal = service.resolve_principal(tokens.access.token.as_str());
    assert!(matches!(
        principal,
        Ok(ref principal) if principal.user_id() == user.id
            && principal.role() == "analyst"
            && principal.area() == "CI2"
    ));
}

#[tokio::test]
async fn unknown_email_and_wrong_password_fail_identically() {
    let (service, _, hasher, _) = seeded_service().await;

    let unknown = service.login("ghost@sgi.test", "whatever-password").await;
    let wrong = service.login("maria@sgi.test", "wrong-password").await;

    assert!(matches!(
        unknown,
        Err(AppError::Unauthorized(ref message)) if message == INVALID_CREDENTIALS_MESSAGE
    ));
    assert!(matches!(
        wrong,
        Err(AppError::Unauthorized(ref message)) if message == INVALID_CREDENTIALS_MESSAGE
    ));
    assert_eq!(hasher.hashes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn refresh_token_is_not_accepted_as_access_token() {
    let (service, _, _, _) = seeded_service().await;
    let Ok(tokens) = service.login("maria@sgi.test", "correct-horse-battery").await else {
        panic!("valid credentials should log in");
    };

    let result = service.resolve_principal(tokens.refresh.token.as_str());
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn refresh_reflects_current_account_state() {
    let (service, repository, _, user) = seeded_service().await;
    let Ok(tokens) = service.login("maria@sgi.test", "correct-horse-battery").await else {
        panic!("valid credentials should log in");
    };

    if let Some(stored) = repository.users.lock().await.get_mut(&user.id) {
        stored.area = "TIC".to_owned();
        stored.role = Role::Superuser;
    }

    let refreshed = service.refresh(tokens.refresh.token.as_str()).await;
    let Ok(refreshed) = refreshed else {
        panic!("refresh should succeed for an existing account");
    };
    let principal = service.resolve_principal(refreshed.token.as_str());
    assert!(matches!(
        principal,
        Ok(ref principal) if principal.area() == "TIC" && principal.role() == "superuser"
    ));

    repository.users.lock().await.clear();
    let orphaned = service.refresh(tokens.refresh.token.as_str()).await;
    assert!(matches!(orphaned, Err(AppError::Unauthorized(_))));
}
