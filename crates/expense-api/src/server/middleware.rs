//! HTTP Basic authentication applied in front of every route.
//!
//! Each request is checked on its own; there is no session or token. A request
//! that fails the check is answered with a body-less `401` and never reaches
//! routing, handlers, or storage.

use std::{fmt, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Challenge sent alongside every `401`.
pub const BASIC_CHALLENGE: &str = "Basic realm=\"Restricted\"";

/// The username/password pair accepted by the service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns `true` if `header` is a Basic `Authorization` value carrying
    /// exactly this pair.
    pub fn matches(&self, header: &str) -> bool {
        parse_basic(header).is_some_and(|given| given == *self)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Decode `Basic <base64(username:password)>`.
///
/// The scheme is matched case-insensitively; the password is everything after
/// the first `:` and may itself contain colons.
fn parse_basic(header: &str) -> Option<Credentials> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some(Credentials::new(username, password))
}

/// Middleware rejecting any request that does not carry the configured
/// credentials.
pub async fn require_basic_auth(
    State(credentials): State<Arc<Credentials>>,
    request: Request,
    next: Next,
) -> Response {
    let authorised = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| credentials.matches(v));

    if !authorised {
        debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "rejected request without valid basic credentials"
        );
        return unauthorised();
    }

    next.run(request).await
}

fn unauthorised() -> Response {
    (StatusCode::UNAUTHORIZED, [(WWW_AUTHENTICATE, BASIC_CHALLENGE)]).into_response()
}
