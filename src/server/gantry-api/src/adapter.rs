//! Translation from HTTP request parts to the manager's input contract.
//!
//! This is the only place where the authentication core touches the shape of
//! the framework's request object.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use tracing::warn;

use gantry_auth::AuthRequest;
use gantry_session::{SessionId, SessionStore};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "gantry_session";

/// Extracts the session cookie value from the request headers.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            if parts.next() == Some(SESSION_COOKIE) {
                return parts.next().map(str::to_string);
            }
        }
    }
    None
}

/// Builds the credential-material view of one request.
///
/// Copies the `Authorization` header and resolves the session cookie against
/// the store. A cookie that resolves to nothing (stale or unknown) yields a
/// request without a session; a failing store is logged and likewise treated
/// as session-less.
///
/// Returns the session id alongside so the middleware can write back to the
/// same session when persisting.
pub async fn build_auth_request(
    headers: &HeaderMap,
    path: &str,
    sessions: &dyn SessionStore,
) -> (AuthRequest, Option<SessionId>) {
    let mut request = AuthRequest::new().with_path(path);

    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        request = request.with_authorization(value);
    }

    let session_id = session_cookie(headers);
    if let Some(id) = &session_id {
        match sessions.load(id).await {
            Ok(Some(data)) => request = request.with_session(data),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "session load failed, treating request as session-less");
            }
        }
    }

    (request, session_id)
}
