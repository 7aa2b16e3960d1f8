use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use sgi_core::AppError;
use tower_http::cors::{Any, CorsLayer};

/// Builds the CORS layer. Any origin is allowed when none is configured.
pub(super) fn build_cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, AppError> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    match allowed_origin {
        Some(origin) => Ok(layer.allow_origin(HeaderValue::from_str(origin).map_err(
            |error| AppError::Internal(format!("invalid CORS_ALLOWED_ORIGIN: {error}")),
        )?)),
        None => Ok(layer.allow_origin(Any)),
    }
}
