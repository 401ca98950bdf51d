//! Session cookie authentication and identity extractors.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use serde::Serialize;
use std::future::{Ready, ready};
use uuid::Uuid;

use blogicum_core::ports::{AuthError, TokenClaims};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "blogicum_session";

/// Signed-in user.
///
/// Use this in handlers to require a session; anonymous visitors are
/// redirected to the login page:
/// ```ignore
/// async fn create_form(identity: Identity) -> AppResult<HttpResponse> { ... }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

impl Identity {
    fn resolve(req: &HttpRequest) -> Result<Self, AuthError> {
        let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
            tracing::error!("AppState not found in app data");
            AuthError::InvalidToken("Server configuration error".to_string())
        })?;

        let token = session_token(req).ok_or(AuthError::MissingAuth)?;
        state.tokens.validate_token(&token).map(Identity::from)
    }
}

/// Token from the session cookie, or from an `Authorization: Bearer` header.
fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Identity::resolve(req).map_err(|e| {
            tracing::debug!(error = %e, path = %req.path(), "Login required");
            let next = match req.query_string() {
                "" => req.path().to_string(),
                query => format!("{}?{}", req.path(), query),
            };
            AppError::LoginRequired { next }
        }))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(Identity::resolve(req).ok())))
    }
}

/// Cookie that opens a session carrying `token`.
pub fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.session.secure)
        .max_age(CookieDuration::seconds(state.tokens.expiration_seconds()))
        .finish()
}

/// Cookie that ends the session.
pub fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// Only local paths are accepted as post-login destinations.
///
/// Browsers drop tabs and newlines inside URLs, so `/\t/host` would
/// still reach another host; any control character disqualifies the value.
pub fn safe_next(next: Option<&str>) -> Option<String> {
    next.filter(|n| {
        !n.chars().any(|c| c.is_ascii_control())
            && n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
    })
    .map(str::to_string)
}
