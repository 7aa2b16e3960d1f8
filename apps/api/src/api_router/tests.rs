use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use sgi_application::{AccessTokenCodec, TokenClaims, TokenKind};
use sgi_core::UserId;
use sgi_domain::{AreaName, DEFAULT_AREAS};
use sgi_infrastructure::{InMemoryStore, JwtAccessTokenCodec, JwtSettings};
use tower::ServiceExt;

use crate::api_services::build_in_memory_state;

use super::build_router;

const BOOTSTRAP_TOKEN: &str = "bootstrap-secret";

fn jwt_settings() -> JwtSettings {
    JwtSettings {
        access_secret: "access-secret-for-router-tests-0123456789".to_owned(),
        refresh_secret: "refresh-secret-for-router-tests-0123456789".to_owned(),
        access_ttl: Duration::minutes(15),
        refresh_ttl: Duration::hours(1),
    }
}

fn test_router() -> Router {
    let areas = DEFAULT_AREAS
        .iter()
        .filter_map(|name| AreaName::new(*name).ok())
        .collect();
    let store = Arc::new(InMemoryStore::with_areas(areas));
    let state = build_in_memory_state(store, jwt_settings(), Some(BOOTSTRAP_TOKEN.to_owned()));
    let Ok(state) = state else {
        panic!("in-memory state should build");
    };
    let Ok(router) = build_router(state, None) else {
        panic!("router should build");
    };
    router
}

fn token_for(user_id: UserId, role: &str, area: &str) -> String {
    let Ok(codec) = JwtAccessTokenCodec::new(jwt_settings()) else {
        panic!("codec should accept test secrets");
    };
    let issued = codec.issue(&TokenClaims {
        user_id,
        role: role.to_owned(),
        area: area.to_owned(),
        kind: TokenKind::Access,
    });
    let Ok(issued) = issued else {
        panic!("token should be issued");
    };
    issued.token
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let Ok(request) = builder.body(body) else {
        panic!("request should build");
    };

    let Ok(response) = router.clone().oneshot(request).await else {
        panic!("router should respond");
    };
    let status = response.status();
    let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
        panic!("response body should be readable");
    };
    let payload = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, payload)
}

fn new_user_payload(correo: &str, nivel: &str, area: &str) -> Value {
    json!({
        "nombre": "Ana",
        "apellido": "Rojas",
        "correo": correo,
        "password": "correct-horse-battery",
        "nivel": nivel,
        "area": area,
    })
}

#[tokio::test]
async fn cross_area_read_is_denied_until_a_grant_is_issued() {
    let router = test_router();
    let admin = token_for(UserId::new(), "admin", "SEP");
    let sep_user = token_for(UserId::new(), "user", "SEP");

    let (status, analyst) = send(
        &router,
        Method::POST,
        "/users",
        Some(admin.as_str()),
        Some(new_user_payload("analista@sgi.test", "analyst", "CI2")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(analyst_id) = analyst["id"].as_str() else {
        panic!("created user should carry an id");
    };
    let Ok(analyst_uuid) = uuid::Uuid::parse_str(analyst_id) else {
        panic!("user id should be a UUID");
    };
    let analyst_token = token_for(UserId::from_uuid(analyst_uuid), "analyst", "CI2");

    let (status, persona) = send(
        &router,
        Method::POST,
        "/personas",
        Some(sep_user.as_str()),
        Some(json!({ "nombre": "Carlos", "cedula": "V-123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(persona["area"], "SEP");
    let Some(persona_id) = persona["id"].as_str() else {
        panic!("created record should carry an id");
    };
    let persona_uri = format!("/personas/{persona_id}");

    let (status, denial) = send(
        &router,
        Method::GET,
        persona_uri.as_str(),
        Some(analyst_token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(denial["entityArea"], "SEP");
    assert_eq!(denial["entityName"], "Persona");
    assert!(denial["error"].is_string());

    let (status, grant) = send(
        &router,
        Method::POST,
        "/configuracion/acceso-temporal",
        Some(admin.as_str()),
        Some(json!({
            "user_id": analyst_id,
            "entity_id": persona_id,
            "entity_type": "personas",
            "expires_at": (Utc::now() + Duration::hours(1)).to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(grant["entity_type"], "personas");

    let (status, details) = send(
        &router,
        Method::GET,
        persona_uri.as_str(),
        Some(analyst_token.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["record"]["id"], persona_id);
}

#[tokio::test]
async fn created_records_take_the_creator_area() {
    let router = test_router();
    let tic_user = token_for(UserId::new(), "user", "TIC");

    let (status, caso) = send(
        &router,
        Method::POST,
        "/casos",
        Some(tic_user.as_str()),
        Some(json!({ "nombre": "Caso Norte", "area": "SEP" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(caso["area"], "TIC");
    assert_eq!(caso["entity_type"], "casos");
    assert!(caso["attributes"].get("area").is_none());
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let router = test_router();

    let (status, body) = send(&router, Method::GET, "/casos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&router, Method::GET, "/casos", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_and_malformed_ids_are_not_found_even_for_admins() {
    let router = test_router();
    let admin = token_for(UserId::new(), "admin", "SEP");

    let missing = format!("/vehiculos/{}", uuid::Uuid::new_v4());
    let (status, body) = send(
        &router,
        Method::GET,
        missing.as_str(),
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Entity not found");

    let (status, _) = send(
        &router,
        Method::GET,
        "/vehiculos/not-a-uuid",
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_link_target_is_rejected() {
    let router = test_router();
    let admin = token_for(UserId::new(), "admin", "SEP");
    let (status, empresa) = send(
        &router,
        Method::POST,
        "/empresas",
        Some(admin.as_str()),
        Some(json!({ "nombre": "Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(empresa_id) = empresa["id"].as_str() else {
        panic!("created record should carry an id");
    };

    let (status, _) = send(
        &router,
        Method::POST,
        format!("/empresas/{empresa_id}/links").as_str(),
        Some(admin.as_str()),
        Some(json!({
            "entity_type": "mensajes",
            "entity_id": uuid::Uuid::new_v4().to_string(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bootstrap_then_login_reaches_user_administration() {
    let router = test_router();
    let mut payload = new_user_payload("root@sgi.test", "", "Despacho");
    payload["token"] = json!(BOOTSTRAP_TOKEN);

    let (status, created) =
        send(&router, Method::POST, "/auth/bootstrap", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["nivel"], "admin");
    assert!(created.get("password_hash").is_none());

    let (status, wrong) = send(
        &router,
        Method::POST,
        "/login",
        None,
        Some(json!({ "correo": "root@sgi.test", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(wrong["error"].is_string());

    let (status, tokens) = send(
        &router,
        Method::POST,
        "/login",
        None,
        Some(json!({ "correo": "ROOT@sgi.test", "password": "correct-horse-battery" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tokens["id"], created["id"]);
    let Some(access_token) = tokens["accessToken"].as_str() else {
        panic!("login should return an access token");
    };

    let (status, users) = send(&router, Method::GET, "/users", Some(access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(matches!(users.as_array(), Some(users) if users.len() == 1));

    let (status, refreshed) = send(
        &router,
        Method::POST,
        "/refresh-token",
        None,
        Some(json!({ "refreshToken": tokens["refreshToken"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(refreshed["accessToken"].is_string());
}

#[tokio::test]
async fn area_catalog_rejects_duplicates_ignoring_case() {
    let router = test_router();
    let admin = token_for(UserId::new(), "admin", "SEP");

    let (status, _) = send(
        &router,
        Method::POST,
        "/configuracion/area",
        Some(admin.as_str()),
        Some(json!({ "area": "Legal" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &router,
        Method::POST,
        "/configuracion/area",
        Some(admin.as_str()),
        Some(json!({ "area": "legal" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, areas) = send(
        &router,
        Method::GET,
        "/configuracion/areas",
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(matches!(areas.as_array(), Some(areas) if areas.len() == DEFAULT_AREAS.len() + 1));
}

#[tokio::test]
async fn health_reports_disabled_postgres_without_pool() {
    let router = test_router();

    let (status, body) = send(&router, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["postgres"]["status"], "disabled");
}

#[tokio::test]
async fn rated_cases_show_up_in_management_totals() {
    let router = test_router();
    let operator = token_for(UserId::new(), "user", "SEP");
    let analyst = token_for(UserId::new(), "analyst", "SEP");

    let (status, caso) = send(
        &router,
        Method::POST,
        "/casos",
        Some(operator.as_str()),
        Some(json!({ "nombre": "Caso Sur", "modalidad": "fraude" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let Some(caso_id) = caso["id"].as_str() else {
        panic!("created caso should carry an id");
    };

    let (status, rated) = send(
        &router,
        Method::PUT,
        format!("/casos/valorar/{caso_id}").as_str(),
        Some(analyst.as_str()),
        Some(json!({ "valor": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rated["attributes"]["vanalista"], 4);

    let (status, _) = send(
        &router,
        Method::PUT,
        format!("/casos/valorar/{caso_id}").as_str(),
        Some(operator.as_str()),
        Some(json!({ "valor": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let today = Utc::now().date_naive().to_string();
    let period = json!({ "area": "SEP", "start_date": today, "end_date": today });
    let (status, totals) = send(
        &router,
        Method::POST,
        "/gestion",
        Some(analyst.as_str()),
        Some(period),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(totals["counts"]["casos"], 1);
    assert_eq!(totals["counts"]["personas"], 0);

    let (status, modalities) = send(
        &router,
        Method::POST,
        "/gestion/area-modalidad",
        Some(analyst.as_str()),
        Some(json!({ "start_date": today, "end_date": today })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(modalities[0]["area"], "SEP");
    assert_eq!(modalities[0]["casos"][0]["modalidad"], "fraude");
}

#[tokio::test]
async fn management_totals_reject_reversed_periods_and_foreign_areas() {
    let router = test_router();
    let superuser = token_for(UserId::new(), "superuser", "SEP");

    let (status, _) = send(
        &router,
        Method::POST,
        "/gestion/por-area",
        Some(superuser.as_str()),
        Some(json!({ "start_date": "2026-03-31", "end_date": "2026-03-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        Method::POST,
        "/gestion",
        Some(superuser.as_str()),
        Some(json!({ "area": "TIC", "start_date": "2026-03-01", "end_date": "2026-03-31" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, own) = send(
        &router,
        Method::POST,
        "/gestion/user",
        Some(superuser.as_str()),
        Some(json!({ "start_date": "2026-03-01", "end_date": "2026-03-31" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(matches!(own["counts"].as_object(), Some(counts) if counts.len() == 9));
}
