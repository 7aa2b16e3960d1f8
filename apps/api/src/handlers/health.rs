use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use sqlx::PgPool;

use crate::dto::{DependencyProbe, HealthResponse, ProbeState};
use crate::state::AppState;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Reports readiness. Answers 503 when a configured dependency is unreachable.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let postgres = match state.postgres_pool.as_ref() {
        Some(pool) => probe_postgres(pool).await,
        None => DependencyProbe {
            status: ProbeState::Disabled,
            detail: None,
        },
    };

    let ready = postgres.status != ProbeState::Error;
    let (http_status, status) = if ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            ready,
            postgres,
        }),
    )
}

async fn probe_postgres(pool: &PgPool) -> DependencyProbe {
    let round_trip = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool);

    let failure = match tokio::time::timeout(PROBE_TIMEOUT, round_trip).await {
        Ok(Ok(_)) => None,
        Ok(Err(error)) => Some(format!("postgres check failed: {error}")),
        Err(_) => Some(format!(
            "postgres did not answer within {}s",
            PROBE_TIMEOUT.as_secs()
        )),
    };

    DependencyProbe {
        status: if failure.is_some() {
            ProbeState::Error
        } else {
            ProbeState::Ok
        },
        detail: failure,
    }
}
