use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sgi_core::{AppError, AppResult, Principal, UserId};
use sgi_domain::{AreaName, AuditAction, Role};
use tokio::sync::Mutex;

use crate::{
    AreaRepository, AuditEvent, AuditRepository, PasswordHasher, UserRecord, UserRepository,
};

use super::{CreateUserInput, UpdateUserInput, UserService, UserServiceDependencies};

#[derive(Default)]
struct FakeUserStore {
    users: Mutex<HashMap<UserId, UserRecord>>,
    areas: Mutex<Vec<AreaName>>,
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl UserRepository for FakeUserStore {
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

    async fn list_users(&self, limit: usize, offset: usize) -> AppResult<Vec<UserRecord>> {
        let mut users: Vec<UserRecord> = self.users.lock().await.values().cloned().collect();
        users.sort_by(|left, right| left.email.cmp(&right.email));
        Ok(users.into_iter().skip(offset).take(limit).collect())
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

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("user not found".to_owned()))?;
        user.password_hash = password_hash.to_owned();
        Ok(())
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.users.lock().await.remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl AreaRepository for FakeUserStore {
    async fn list_areas(&self) -> AppResult<Vec<AreaName>> {
        Ok(self.areas.lock().await.clone())
    }

    async fn find_area(&self, name: &str) -> AppResult<Option<AreaName>> {
        Ok(self
            .areas
            .lock()
            .await
            .iter()
            .find(|area| area.same_entry(name))
            .cloned())
    }

    async fn create_area(&self, area: &AreaName) -> AppResult<()> {
        self.areas.lock().await.push(area.clone());
        Ok(())
    }

    async fn rename_area(&self, _current: &str, _renamed: &AreaName) -> AppResult<()> {
        Ok(())
    }

    async fn remove_area(&self, _name: &str) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl AuditRepository for FakeUserStore {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct PrefixPasswordHasher;

impl PasswordHasher for PrefixPasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

async fn store_with_areas() -> Arc<FakeUserStore> {
    let store = Arc::new(FakeUserStore::default());
    for name in ["SEP", "CI2", "TIC"] {
        if let Ok(area) = AreaName::new(name) {
            store.areas.lock().await.push(area);
        }
    }
    store
}

fn service(store: &Arc<FakeUserStore>, bootstrap_token: Option<&str>) -> UserService {
    UserService::new(
        UserServiceDependencies {
            users: store.clone(),
            areas: store.clone(),
            password_hasher: Arc::new(PrefixPasswordHasher),
            audit: store.clone(),
        },
        bootstrap_token.map(str::to_owned),
    )
}

fn input(email: &str, role: &str, area: &str) -> CreateUserInput {
    CreateUserInput {
        nombre: "Luis".to_owned(),
        apellido: "Perez".to_owned(),
        cedula: Some(" V-12345678 ".to_owned()),
        telefono: None,
        email: email.to_owned(),
        password: "correct-horse-battery".to_owned(),
        role: role.to_owned(),
        area: area.to_owned(),
    }
}

fn admin() -> Principal {
    Principal::new(UserId::new(), "admin", "SEP")
}

#[tokio::test]
async fn create_user_normalizes_email_role_and_area() {
    let store = store_with_areas().await;

    let created = service(&store, None)
        .create_user(&admin(), input("Luis@SGI.test", "Analyst", "ci2"))
        .await;

    assert!(matches!(
        created,
        Ok(ref user) if user.email == "luis@sgi.test"
            && user.role == Role::Analyst
            && user.area == "CI2"
            && user.cedula.as_deref() == Some("V-12345678")
            && user.password_hash == "hashed:correct-horse-battery"
    ));
}

#[tokio::test]
async fn create_user_rejects_unknown_area_and_duplicate_email() {
    let store = store_with_areas().await;
    let service = service(&store, None);

    let unknown_area = service
        .create_user(&admin(), input("a@sgi.test", "user", "Legal"))
        .await;
    assert!(matches!(unknown_area, Err(AppError::Validation(_))));

    assert!(
        service
            .create_user(&admin(), input("b@sgi.test", "user", "TIC"))
            .await
            .is_ok()
    );
    let duplicate = service
        .create_user(&admin(), input("B@sgi.test", "user", "TIC"))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn only_admins_manage_users() {
    let store = store_with_areas().await;
    let superuser = Principal::new(UserId::new(), "superuser", "SEP");

    let result = service(&store, None)
        .create_user(&superuser, input("c@sgi.test", "user", "SEP"))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn superusers_can_read_single_user() {
    let store = store_with_areas().await;
    let service = service(&store, None);
    let Ok(created) = service
        .create_user(&admin(), input("d@sgi.test", "user", "SEP"))
        .await
    else {
        panic!("admin should create users");
    };
    let superuser = Principal::new(UserId::new(), "superuser", "TIC");

    let fetched = service.get_user(&superuser, created.id).await;
    assert!(matches!(fetched, Ok(ref user) if user.id == created.id));

    let listing = service.list_users(&superuser, None, None).await;
    assert!(matches!(listing, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn update_user_changes_role_and_area() {
    let store = store_with_areas().await;
    let service = service(&store, None);
    let Ok(created) = service
        .create_user(&admin(), input("e@sgi.test", "user", "SEP"))
        .await
    else {
        panic!("admin should create users");
    };

    let updated = service
        .update_user(
            &admin(),
            created.id,
            UpdateUserInput {
                role: Some("superuser".to_owned()),
                area: Some("tic".to_owned()),
                ..UpdateUserInput::default()
            },
        )
        .await;

    assert!(matches!(
        updated,
        Ok(ref user) if user.role == Role::Superuser && user.area == "TIC"
    ));
}

#[tokio::test]
async fn admin_cannot_delete_own_account() {
    let store = store_with_areas().await;
    let actor = admin();

    let result = service(&store, None)
        .delete_user(&actor, actor.user_id())
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn reset_password_validates_and_rehashes() {
    let store = store_with_areas().await;
    let service = service(&store, None);
    let Ok(created) = service
        .create_user(&admin(), input("f@sgi.test", "user", "SEP"))
        .await
    else {
        panic!("admin should create users");
    };

    assert!(
        service
            .reset_password(&admin(), created.id, "short")
            .await
            .is_err()
    );
    assert!(
        service
            .reset_password(&admin(), created.id, "another-long-passphrase")
            .await
            .is_ok()
    );

    let stored = store.users.lock().await.get(&created.id).cloned();
    assert!(matches!(
        stored,
        Some(user) if user.password_hash == "hashed:another-long-passphrase"
    ));
}

#[tokio::test]
async fn bootstrap_creates_first_admin_once() {
    let store = store_with_areas().await;
    let service = service(&store, Some("bootstrap-secret"));

    let wrong_token = service
        .bootstrap_admin("nope", input("root@sgi.test", "user", "SEP"))
        .await;
    assert!(matches!(wrong_token, Err(AppError::Unauthorized(_))));

    let created = service
        .bootstrap_admin("bootstrap-secret", input("root@sgi.test", "user", "SEP"))
        .await;
    assert!(matches!(created, Ok(ref user) if user.role == Role::Admin));

    let repeated = service
        .bootstrap_admin("bootstrap-secret", input("other@sgi.test", "user", "SEP"))
        .await;
    assert!(matches!(repeated, Err(AppError::Conflict(_))));

    let events = store.events.lock().await;
    assert!(
        events
            .iter()
            .all(|event| event.action == AuditAction::UserCreated)
    );
}

#[tokio::test]
async fn bootstrap_is_disabled_without_token() {
    let store = store_with_areas().await;

    let result = service(&store, None)
        .bootstrap_admin("", input("root@sgi.test", "admin", "SEP"))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}
