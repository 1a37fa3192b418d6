//! Per-scope authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use gantry_auth::{AuthOutcome, FailureMode, Identity, RequestContext};
use gantry_session::{generate_session_id, SessionData, SessionStore};

use crate::adapter::{build_auth_request, SESSION_COOKIE};
use crate::failure::CallerClass;
use crate::state::AppState;

/// State handed to one scope's instance of [`require_auth`].
#[derive(Clone)]
pub struct ScopedAuth {
    state: AppState,
    scope: &'static str,
}

impl ScopedAuth {
    /// Binds the shared state to a scope.
    pub fn new(state: AppState, scope: &'static str) -> Self {
        Self { state, scope }
    }
}

/// Authentication gate for one scope.
///
/// Install with `axum::middleware::from_fn_with_state`. On success the
/// resolved [`Identity`] is inserted into the request extensions and, when
/// the persistence policy allows, written to the session store. On failure
/// the response comes from the failure endpoint, classified by the scope's
/// configured failure mode.
pub async fn require_auth(
    State(scoped): State<ScopedAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    let (auth_request, session_id) = build_auth_request(
        request.headers(),
        request.uri().path(),
        scoped.state.sessions.as_ref(),
    )
    .await;

    let mut context = RequestContext::new();
    let outcome = scoped
        .state
        .manager
        .authenticate(scoped.scope, &auth_request, &mut context)
        .await;

    match outcome {
        AuthOutcome::Success { identity, persist } => {
            let fresh_cookie = if persist {
                persist_identity(
                    scoped.state.sessions.as_ref(),
                    session_id,
                    auth_request.session().cloned(),
                    identity,
                )
                .await
            } else {
                None
            };

            request.extensions_mut().insert(identity);
            let mut response = next.run(request).await;

            if let Some(cookie) = fresh_cookie {
                match HeaderValue::from_str(&cookie) {
                    Ok(value) => {
                        response.headers_mut().append(SET_COOKIE, value);
                    }
                    Err(_) => warn!("dropping malformed session cookie"),
                }
            }
            response
        }
        AuthOutcome::Failure(failure) => {
            let caller = match scoped.state.config.failure_mode(scoped.scope) {
                FailureMode::Challenge => CallerClass::Api,
                FailureMode::Redirect => CallerClass::Interactive {
                    origin: request
                        .uri()
                        .path_and_query()
                        .map(|pq| pq.as_str().to_string()),
                },
            };
            scoped.state.failure.respond(&failure, caller)
        }
    }
}

/// Writes a persistable identity into the session store.
///
/// Only user identities are cached; the system principal re-authenticates on
/// every request and anonymous carries no information. Reuses the request's
/// session id when one was presented, otherwise starts a fresh session and
/// returns the cookie to set on the response. Store failures are logged and
/// swallowed; the request itself already authenticated.
async fn persist_identity(
    sessions: &dyn SessionStore,
    session_id: Option<String>,
    session: Option<SessionData>,
    identity: Identity,
) -> Option<String> {
    let user_id = identity.user_id()?;

    let (id, mut data, fresh) = match session_id {
        Some(id) => (id, session.unwrap_or_default(), false),
        None => (generate_session_id(), SessionData::new(), true),
    };

    data.set_user_id(user_id);
    if let Err(e) = sessions.save(&id, &data).await {
        warn!(error = %e, "failed to persist identity in session");
        return None;
    }

    fresh.then(|| format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"))
}
