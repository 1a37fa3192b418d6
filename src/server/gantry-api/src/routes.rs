//! Router assembly and built-in endpoints.

use std::collections::HashMap;

use axum::extract::Query;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Extension, Json, Router};

use gantry_auth::config::{SCOPE_API_V3, SCOPE_WEB};
use gantry_auth::Identity;

use crate::middleware::{require_auth, ScopedAuth};
use crate::state::AppState;

/// Assembles the application router.
///
/// `/api/v3/*` runs the `api_v3` chain, `/my/*` the `web` chain; `/health`
/// and the failure page stay unauthenticated.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/v3/whoami", get(whoami))
        .route_layer(from_fn_with_state(
            ScopedAuth::new(state.clone(), SCOPE_API_V3),
            require_auth,
        ));

    let web = Router::new()
        .route("/my/page", get(my_page))
        .route_layer(from_fn_with_state(
            ScopedAuth::new(state, SCOPE_WEB),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/auth/failure", get(auth_failure))
        .merge(api)
        .merge(web)
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Echoes the identity the middleware resolved for this request.
async fn whoami(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}

/// Minimal interactive page, guarded by the `web` scope.
async fn my_page(Extension(identity): Extension<Identity>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "page": "my",
        "identity": identity,
    }))
}

/// Failure-display page; renders the redirect parameters back to the caller.
async fn auth_failure(
    Query(params): Query<HashMap<String, String>>,
) -> Json<HashMap<String, String>> {
    Json(params)
}
