//! Manager input contract and the per-request identity slot.

use gantry_session::SessionData;

use crate::identity::Identity;

/// Credential material extracted from one inbound request.
///
/// Built by the HTTP adapter; the manager and strategies only ever see this
/// view, never the framework's request object.
#[derive(Debug, Clone, Default)]
pub struct AuthRequest {
    authorization: Option<String>,
    session: Option<SessionData>,
    path: Option<String>,
}

impl AuthRequest {
    /// Creates an empty request with no credential material.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the raw `Authorization` header value.
    pub fn with_authorization(mut self, header: impl Into<String>) -> Self {
        self.authorization = Some(header.into());
        self
    }

    /// Attaches a session snapshot. Present whenever the request carried a
    /// resolvable session cookie, even if the session is empty.
    pub fn with_session(mut self, session: SessionData) -> Self {
        self.session = Some(session);
        self
    }

    /// Attaches the request path (diagnostics only).
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The raw `Authorization` header value, if any.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// The session snapshot, if the request carried one.
    pub fn session(&self) -> Option<&SessionData> {
        self.session.as_ref()
    }

    /// The request path, if known.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

/// Per-request slot holding the resolved identity.
///
/// Created per inbound request and written at most once by the manager;
/// downstream authorization reads it. A second write is ignored (first
/// resolution wins).
#[derive(Debug, Default)]
pub struct RequestContext {
    identity: Option<Identity>,
}

impl RequestContext {
    /// Creates an unresolved context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the resolved identity. Ignored if already resolved.
    pub fn resolve(&mut self, identity: Identity) {
        if self.identity.is_none() {
            self.identity = Some(identity);
        }
    }

    /// The resolved identity, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.identity
    }

    /// Whether an identity has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.identity.is_some()
    }
}
