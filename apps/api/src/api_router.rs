use axum::Router;
use axum::extract::Extension;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use sgi_core::AppError;
use sgi_domain::EntityKind;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    cors_allowed_origin: Option<&str>,
) -> Result<Router, AppError> {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/login", post(handlers::auth::login_handler))
        .route("/refresh-token", post(handlers::auth::refresh_token_handler))
        .route("/auth/bootstrap", post(handlers::auth::bootstrap_handler));

    let protected_routes = EntityKind::all()
        .into_iter()
        .fold(Router::new(), |router, kind| router.merge(record_routes(kind)))
        .route(
            "/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/users/{user_id}",
            get(handlers::users::get_user_handler)
                .put(handlers::users::update_user_handler)
                .delete(handlers::users::delete_user_handler),
        )
        .route(
            "/users/{user_id}/password",
            put(handlers::users::reset_password_handler),
        )
        .route(
            "/configuracion/areas",
            get(handlers::security::list_areas_handler),
        )
        .route(
            "/configuracion/area",
            post(handlers::security::add_area_handler)
                .put(handlers::security::rename_area_handler)
                .delete(handlers::security::remove_area_handler),
        )
        .route(
            "/configuracion/acceso-temporal",
            get(handlers::security::list_temporary_access_handler)
                .post(handlers::security::create_temporary_access_handler),
        )
        .route(
            "/configuracion/acceso-temporal/purge",
            post(handlers::security::purge_temporary_access_handler),
        )
        .route(
            "/casos/valorar/{record_id}",
            put(handlers::records::rate_case_handler),
        )
        .route("/gestion", post(handlers::reports::area_report_handler))
        .route(
            "/gestion/por-area",
            post(handlers::reports::report_by_area_handler),
        )
        .route(
            "/gestion/area-modalidad",
            post(handlers::reports::modalidad_report_handler),
        )
        .route("/gestion/user", post(handlers::reports::user_report_handler))
        .route(
            "/gestion/user-area-modalidad",
            post(handlers::reports::user_modalidad_report_handler),
        )
        .route(
            "/configuracion/auditoria",
            get(handlers::security::list_audit_log_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors::build_cors_layer(cors_allowed_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}

/// Mounts the CRUD and cross-reference routes of one collection.
fn record_routes(kind: EntityKind) -> Router<AppState> {
    let segment = kind.route_segment();

    Router::new()
        .route(
            format!("/{segment}").as_str(),
            get(handlers::records::list_records_handler)
                .post(handlers::records::create_record_handler),
        )
        .route(
            format!("/{segment}/{{record_id}}").as_str(),
            get(handlers::records::get_record_handler)
                .put(handlers::records::update_record_handler)
                .delete(handlers::records::delete_record_handler),
        )
        .route(
            format!("/{segment}/{{record_id}}/links").as_str(),
            post(handlers::records::link_records_handler),
        )
        .route(
            format!("/{segment}/{{record_id}}/links/{{entity_type}}/{{entity_id}}").as_str(),
            delete(handlers::records::unlink_records_handler),
        )
        .layer(Extension(kind))
}

#[cfg(test)]
mod tests;
