//! API layer - HTTP handlers and routing
//!
//! Every entity is managed through generated-style CRUD endpoints nested
//! under `/admin/api` and guarded by the admin token middleware. The only
//! unauthenticated route is `/health`.

pub mod middleware;
pub mod news_links;
pub mod posts;
pub mod startups;
pub mod tags;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState};

/// Build the API router with the admin guard applied
pub fn build_api_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .nest("/tags", tags::router())
        .nest("/startups", startups::router().merge(news_links::router()))
        .nest("/posts", posts::router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_admin,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/admin/api", admin_routes)
}

/// Build the complete router with CORS and request tracing
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(_) => {
            tracing::warn!(cors_origin, "Invalid CORS origin, allowing none");
            CorsLayer::new()
        }
    };

    build_api_router(state.clone())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - database liveness probe
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    sqlx::query("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Health check failed");
            ApiError::internal_error("Database unavailable")
        })?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
