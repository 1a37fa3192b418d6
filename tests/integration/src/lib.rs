//! Integration tests for the Gantry authentication chain.
//!
//! These drive the assembled router in-process, covering the complete path
//! from request headers through adapter, manager, strategies, and failure
//! endpoint to the wire response.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use base64::Engine;
use tower::ServiceExt;

use gantry_api::AppState;
use gantry_auth::{AuthConfig, AuthManager, MasterAccount};
use gantry_session::{MemoryStore, SessionData, SessionStore};

// ============================================================================
// Harness
// ============================================================================

/// An assembled application with a handle on its session store.
pub struct TestApp {
    pub router: Router,
    pub sessions: Arc<MemoryStore>,
}

/// The default test configuration: master account `root`/`toor`, standard
/// `api_v3` and `web` scopes.
pub fn test_config() -> AuthConfig {
    AuthConfig {
        master_account: Some(MasterAccount {
            user: "root".to_string(),
            password: "toor".to_string(),
        }),
        ..AuthConfig::default()
    }
}

/// Builds the application from a configuration, backed by an in-memory
/// session store.
pub fn test_app_with(config: AuthConfig) -> TestApp {
    let sessions = Arc::new(MemoryStore::default());
    let manager = Arc::new(AuthManager::from_config(&config).expect("test config must wire"));
    let state = AppState::new(manager, sessions.clone(), Arc::new(config));

    TestApp {
        router: gantry_api::router(state),
        sessions,
    }
}

/// Builds the application with the default test configuration.
pub fn test_app() -> TestApp {
    test_app_with(test_config())
}

/// Sends a GET request with the given headers through the router.
pub async fn get(app: &TestApp, uri: &str, headers: &[(&str, &str)]) -> Response {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }

    app.router
        .clone()
        .oneshot(request.body(Body::empty()).expect("request must build"))
        .await
        .expect("router is infallible")
}

/// Encodes an `Authorization: Basic` header value.
pub fn basic_auth(user: &str, password: &str) -> String {
    let credentials =
        base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password}"));
    format!("Basic {credentials}")
}

/// Reads a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body must read");
    serde_json::from_slice(&bytes).expect("body must be JSON")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gantry_auth::{
        AuthRequest, AuthStrategy, Identity, ScopePolicy, StrategyRegistry, StrategyResult,
    };
    use gantry_session_sqlite::SqliteStore;

    #[tokio::test]
    async fn test_health_is_unauthenticated() {
        let app = test_app();
        let response = get(&app, "/health", &[]).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    // ------------------------------------------------------------------
    // api_v3 scope
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_api_without_credentials_is_401() {
        let app = test_app();
        let response = get(&app, "/api/v3/whoami", &[]).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        // no strategy failed, so no challenge is advertised
        assert!(response.headers().get("WWW-Authenticate").is_none());
    }

    #[tokio::test]
    async fn test_api_correct_basic_auth() {
        let app = test_app();
        let response = get(
            &app,
            "/api/v3/whoami",
            &[("Authorization", &basic_auth("root", "toor"))],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        // the identity is never persisted for api_v3
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let body = body_json(response).await;
        assert_eq!(body["kind"], "system");
    }

    #[tokio::test]
    async fn test_api_wrong_basic_auth_gets_challenge() {
        let app = test_app();
        let response = get(
            &app,
            "/api/v3/whoami",
            &[("Authorization", &basic_auth("root", "wrong"))],
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get("WWW-Authenticate").unwrap(),
            "Basic realm=\"Gantry API\""
        );
    }

    #[tokio::test]
    async fn test_api_session_cookie_resolves_user() {
        let app = test_app();
        let mut session = SessionData::new();
        session.set_user_id(42);
        app.sessions.save("sid-42", &session).await.unwrap();

        let response = get(
            &app,
            "/api/v3/whoami",
            &[("Cookie", "gantry_session=sid-42")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "user");
        assert_eq!(body["id"], 42);
    }

    #[tokio::test]
    async fn test_api_basic_auth_tried_before_session() {
        let app = test_app();
        let mut session = SessionData::new();
        session.set_user_id(42);
        app.sessions.save("sid-42", &session).await.unwrap();

        let response = get(
            &app,
            "/api/v3/whoami",
            &[
                ("Authorization", &basic_auth("root", "toor")),
                ("Cookie", "gantry_session=sid-42"),
            ],
        )
        .await;

        // first match wins: basic_auth is ahead of session for api_v3
        let body = body_json(response).await;
        assert_eq!(body["kind"], "system");
    }

    #[tokio::test]
    async fn test_api_wrong_basic_auth_falls_through_to_session() {
        let app = test_app();
        let mut session = SessionData::new();
        session.set_user_id(42);
        app.sessions.save("sid-42", &session).await.unwrap();

        let response = get(
            &app,
            "/api/v3/whoami",
            &[
                ("Authorization", &basic_auth("root", "wrong")),
                ("Cookie", "gantry_session=sid-42"),
            ],
        )
        .await;

        // the basic failure is recorded but the chain continues
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 42);
    }

    // ------------------------------------------------------------------
    // web scope
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_web_empty_session_is_anonymous() {
        let app = test_app();
        app.sessions
            .save("sid-empty", &SessionData::new())
            .await
            .unwrap();

        let response = get(&app, "/my/page", &[("Cookie", "gantry_session=sid-empty")]).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["identity"]["kind"], "anonymous");
    }

    #[tokio::test]
    async fn test_web_without_session_redirects() {
        let app = test_app();
        let response = get(&app, "/my/page", &[]).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(location.starts_with("/auth/failure?"));
        assert!(location.contains("message=no%20applicable%20strategy"));
        assert!(location.contains("origin=%2Fmy%2Fpage"));
    }

    #[tokio::test]
    async fn test_failure_page_recovers_parameters() {
        let app = test_app();
        let response = get(
            &app,
            "/auth/failure?message=no%20applicable%20strategy&origin=%2Fmy%2Fpage",
            &[],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "no applicable strategy");
        assert_eq!(body["origin"], "/my/page");
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Strategy that unconditionally resolves a fixed user, for exercising
    /// the persistence path end to end.
    struct AlwaysUser(u64);

    #[async_trait]
    impl AuthStrategy for AlwaysUser {
        fn name(&self) -> &'static str {
            "always_user"
        }

        fn valid(&self, _request: &AuthRequest) -> bool {
            true
        }

        async fn authenticate(&self, _request: &AuthRequest) -> StrategyResult {
            StrategyResult::Success(Identity::User(self.0))
        }
    }

    #[tokio::test]
    async fn test_storing_scope_persists_user_and_sets_cookie() {
        let registry = StrategyRegistry::builder()
            .strategy(Arc::new(AlwaysUser(7)))
            .register("web", "always_user")
            .scope_store("web", true)
            .build()
            .unwrap();
        let manager = Arc::new(AuthManager::new(registry, ScopePolicy::default()));

        let sessions = Arc::new(MemoryStore::default());
        let state = AppState::new(
            manager,
            sessions.clone(),
            Arc::new(AuthConfig::default()),
        );
        let app = TestApp {
            router: gantry_api::router(state),
            sessions,
        };

        let response = get(&app, "/my/page", &[]).await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        let session_id = cookie
            .strip_prefix("gantry_session=")
            .unwrap()
            .split(';')
            .next()
            .unwrap();

        let stored = app.sessions.load(session_id).await.unwrap().unwrap();
        assert_eq!(stored.user_id(), Some(7));
    }

    // ------------------------------------------------------------------
    // SQLite-backed sessions
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_sqlite_sessions_end_to_end() {
        let sessions = Arc::new(SqliteStore::in_memory(None).await.unwrap());
        let config = test_config();
        let manager = Arc::new(AuthManager::from_config(&config).unwrap());
        let state = AppState::new(manager, sessions.clone(), Arc::new(config));
        let router = gantry_api::router(state);

        let mut session = SessionData::new();
        session.set_user_id(9);
        sessions.save("sid-9", &session).await.unwrap();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v3/whoami")
                    .header("Cookie", "gantry_session=sid-9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 9);
    }
}
