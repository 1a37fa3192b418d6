//! Failure endpoint.
//!
//! The single place where an exhausted authentication chain becomes a wire
//! response. A pure function of the failure and the caller classification;
//! no state is retained between calls.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use gantry_auth::{ChainFailure, Challenge};

/// Default path of the failure-display page.
pub const DEFAULT_FAILURE_PATH: &str = "/auth/failure";

/// Classification of the failing caller, supplied by the routing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerClass {
    /// Direct API caller; answered with a terminal 401.
    Api,
    /// Redirect-capable interactive caller; sent to the failure page.
    Interactive {
        /// URL the failing request originated from, carried along so the
        /// failure page can offer a way back.
        origin: Option<String>,
    },
}

/// Renders authentication failures as HTTP responses.
pub struct FailureEndpoint {
    failure_path: String,
}

impl Default for FailureEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_PATH)
    }
}

impl FailureEndpoint {
    /// Creates an endpoint redirecting interactive callers to `failure_path`.
    pub fn new(failure_path: impl Into<String>) -> Self {
        Self {
            failure_path: failure_path.into(),
        }
    }

    /// Renders the failure for the given caller.
    ///
    /// API callers get a 401 with every challenge header the failing
    /// strategies emitted; interactive callers get a 302 to the failure page
    /// with the reason, origin, and offending strategy as percent-escaped
    /// query parameters.
    pub fn respond(&self, failure: &ChainFailure, caller: CallerClass) -> Response {
        match caller {
            CallerClass::Api => {
                let mut response =
                    (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
                for challenge in failure.challenges() {
                    match HeaderValue::from_str(challenge.value()) {
                        Ok(value) => {
                            response.headers_mut().append(Challenge::HEADER, value);
                        }
                        Err(_) => {
                            warn!(value = %challenge.value(), "dropping malformed challenge header");
                        }
                    }
                }
                response
            }
            CallerClass::Interactive { origin } => {
                let location = self.failure_location(failure, origin.as_deref());
                match HeaderValue::from_str(&location) {
                    Ok(value) => {
                        (StatusCode::FOUND, [(header::LOCATION, value)]).into_response()
                    }
                    // unreachable for escaped values
                    Err(_) => StatusCode::UNAUTHORIZED.into_response(),
                }
            }
        }
    }

    fn failure_location(&self, failure: &ChainFailure, origin: Option<&str>) -> String {
        let mut location = format!(
            "{}?message={}",
            self.failure_path,
            urlencoding::encode(failure.reason())
        );
        if let Some(origin) = origin {
            location.push_str("&origin=");
            location.push_str(&urlencoding::encode(origin));
        }
        if let Some(strategy) = failure.offending_strategy() {
            location.push_str("&strategy=");
            location.push_str(&urlencoding::encode(strategy));
        }
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure_with_challenge() -> ChainFailure {
        let mut failure = ChainFailure::new("api_v3");
        failure.record(
            "basic_auth",
            "wrong user and/or password",
            Some(Challenge::basic("Gantry API")),
        );
        failure
    }

    #[test]
    fn test_api_caller_gets_401_with_challenge() {
        let endpoint = FailureEndpoint::default();
        let response = endpoint.respond(&failure_with_challenge(), CallerClass::Api);

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(Challenge::HEADER).unwrap(),
            "Basic realm=\"Gantry API\""
        );
    }

    #[test]
    fn test_api_caller_without_challenge() {
        let endpoint = FailureEndpoint::default();
        let response = endpoint.respond(&ChainFailure::new("api_v3"), CallerClass::Api);

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(Challenge::HEADER).is_none());
    }

    #[test]
    fn test_interactive_caller_gets_redirect() {
        let mut failure = ChainFailure::new("web");
        failure.record("github", "missing_code", None);

        let endpoint = FailureEndpoint::default();
        let response = endpoint.respond(
            &failure,
            CallerClass::Interactive {
                origin: Some("https://x/y?a=1".to_string()),
            },
        );

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap();

        assert!(location.starts_with("/auth/failure?"));
        assert!(location.contains("message=missing_code"));
        assert!(location.contains("origin=https%3A%2F%2Fx%2Fy%3Fa%3D1"));
        assert!(location.contains("strategy=github"));
    }

    #[test]
    fn test_escaping_round_trip() {
        let mut failure = ChainFailure::new("web");
        failure.record("github", "missing code & more", None);

        let endpoint = FailureEndpoint::default();
        let location = endpoint.failure_location(&failure, Some("https://x/y?a=1"));

        let query = location.split_once('?').unwrap().1;
        let mut message = None;
        let mut origin = None;
        let mut strategy = None;
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap();
            let value = urlencoding::decode(value).unwrap().into_owned();
            match key {
                "message" => message = Some(value),
                "origin" => origin = Some(value),
                "strategy" => strategy = Some(value),
                _ => panic!("unexpected query parameter: {key}"),
            }
        }

        assert_eq!(message.as_deref(), Some("missing code & more"));
        assert_eq!(origin.as_deref(), Some("https://x/y?a=1"));
        assert_eq!(strategy.as_deref(), Some("github"));
    }

    #[test]
    fn test_optional_parameters_omitted() {
        let endpoint = FailureEndpoint::default();
        let location = endpoint.failure_location(&ChainFailure::new("web"), None);

        assert_eq!(location, "/auth/failure?message=no%20applicable%20strategy");
    }
}
