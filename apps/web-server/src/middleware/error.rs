//! Error handling - HTML error pages and redirects.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use blogicum_core::error::DomainError;
use blogicum_shared::ErrorResponse;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt;

use crate::views;

/// Where anonymous visitors are sent to sign in.
pub const LOGIN_URL: &str = "/auth/login/";

/// Application-level error type, rendered as an error page or a redirect.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    /// Anonymous access to a login-required page. `next` is the page to
    /// come back to after signing in.
    LoginRequired { next: String },
    /// Send the visitor elsewhere, e.g. a non-author to the post page.
    Redirect(String),
    Forbidden,
    Internal(String),
}

impl AppError {
    /// Ownership failures redirect to `fallback` instead of failing.
    pub fn or_redirect(err: DomainError, fallback: impl Into<String>) -> Self {
        match err {
            DomainError::Forbidden(_) => AppError::Redirect(fallback.into()),
            other => other.into(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::LoginRequired { next } => write!(f, "Login required for {}", next),
            AppError::Redirect(to) => write!(f, "Redirect to {}", to),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::LoginRequired { .. } | AppError::Redirect(_) => StatusCode::FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let problem = match self {
            AppError::LoginRequired { next } => return redirect_response(&login_url(next)),
            AppError::Redirect(to) => return redirect_response(to),
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code())
            .content_type(header::ContentType::html())
            .body(views::error_page(&problem))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("No {} matches {:?}", entity_type, key))
            }
            DomainError::Validation(errors) => AppError::BadRequest(errors.to_string()),
            DomainError::Duplicate(msg) => AppError::BadRequest(msg),
            DomainError::Forbidden(_) => AppError::Forbidden,
            DomainError::Unauthorized => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// `302 Found` to `location`.
pub fn redirect_response(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Login page URL that returns to `next` afterwards.
pub fn login_url(next: &str) -> String {
    format!(
        "{}?next={}",
        LOGIN_URL,
        utf8_percent_encode(next, NON_ALPHANUMERIC)
    )
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
