//! Sign-up, sign-in, sign-out and profile maintenance.

use actix_web::{HttpResponse, web};
use serde_json::json;

use blogicum_core::domain::{User, ValidationErrors};
use blogicum_core::error::DomainError;
use blogicum_shared::dto::{LoginForm, NextQuery, PasswordChangeForm, ProfileForm, RegisterForm};

use super::{profile_url, redirect};
use crate::forms;
use crate::middleware::auth::{
    Identity, OptionalIdentity, clear_session_cookie, safe_next, session_cookie,
};
use crate::middleware::error::{AppError, AppResult, LOGIN_URL, redirect_response};
use crate::state::AppState;
use crate::views;

/// GET /auth/registration/
pub async fn registration_form(viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    render_registration(&viewer, &RegisterForm::default(), &ValidationErrors::new())
}

/// POST /auth/registration/
pub async fn register(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    form: web::Form<RegisterForm>,
) -> AppResult<HttpResponse> {
    match state.accounts.register(forms::registration(&form)).await {
        Ok(_) => redirect(LOGIN_URL),
        Err(DomainError::Validation(errors)) => render_registration(&viewer, &form, &errors),
        Err(e) => Err(e.into()),
    }
}

/// GET /auth/login/
pub async fn login_form(
    viewer: OptionalIdentity,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    let form = LoginForm {
        next: safe_next(query.next.as_deref()),
        ..LoginForm::default()
    };
    render_login(&viewer, &form, false)
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let user = match state
        .accounts
        .authenticate(form.username.trim(), &form.password)
        .await
    {
        Ok(user) => user,
        Err(DomainError::Unauthorized) => {
            tracing::info!(username = %form.username, "Failed login attempt");
            return render_login(&viewer, &form, true);
        }
        Err(e) => return Err(e.into()),
    };

    let next = safe_next(form.next.as_deref()).unwrap_or_else(|| "/".to_string());
    tracing::info!(user_id = %user.id, "User logged in");
    signed_in(&state, &user, &next)
}

/// POST /auth/logout/
pub async fn logout() -> HttpResponse {
    let mut response = redirect_response("/");
    if let Err(e) = response.add_cookie(&clear_session_cookie()) {
        tracing::warn!(error = %e, "Could not clear session cookie");
    }
    response
}

/// GET /auth/password_change/
pub async fn password_change_form(identity: Identity) -> AppResult<HttpResponse> {
    render_password_change(&identity, &ValidationErrors::new())
}

/// POST /auth/password_change/
pub async fn change_password(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PasswordChangeForm>,
) -> AppResult<HttpResponse> {
    match state
        .accounts
        .change_password(identity.user_id, forms::password_change(&form))
        .await
    {
        Ok(user) => redirect(&profile_url(&user.username)),
        Err(DomainError::Validation(errors)) => render_password_change(&identity, &errors),
        Err(e) => Err(e.into()),
    }
}

/// GET /edit_profile/
pub async fn edit_profile_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = state.accounts.find(identity.user_id).await?;
    render_profile(&identity, &forms::profile_form(&user), &ValidationErrors::new())
}

/// POST /edit_profile/
///
/// The session carries the username, so it is re-issued after a change.
pub async fn edit_profile(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<ProfileForm>,
) -> AppResult<HttpResponse> {
    match state
        .accounts
        .update_profile(identity.user_id, forms::profile_changes(&form))
        .await
    {
        Ok(user) => signed_in(&state, &user, "/"),
        Err(DomainError::Validation(errors)) => render_profile(&identity, &form, &errors),
        Err(e) => Err(e.into()),
    }
}

/// Redirect to `location` with a fresh session cookie for `user`.
fn signed_in(state: &AppState, user: &User, location: &str) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut response = redirect_response(location);
    response
        .add_cookie(&session_cookie(state, token))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

fn render_registration(
    viewer: &OptionalIdentity,
    form: &RegisterForm,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    views::page(
        "registration",
        &json!({
            "title": "Sign up",
            "user": viewer.0,
            "form": { "username": form.username, "email": form.email },
            "errors": errors,
        }),
    )
}

fn render_login(viewer: &OptionalIdentity, form: &LoginForm, failed: bool) -> AppResult<HttpResponse> {
    views::page(
        "login",
        &json!({
            "title": "Log in",
            "user": viewer.0,
            "form": { "username": form.username },
            "next": safe_next(form.next.as_deref()),
            "failed": failed,
        }),
    )
}

fn render_password_change(identity: &Identity, errors: &ValidationErrors) -> AppResult<HttpResponse> {
    views::page(
        "password_change",
        &json!({
            "title": "Change password",
            "user": identity,
            "errors": errors,
        }),
    )
}

fn render_profile(
    identity: &Identity,
    form: &ProfileForm,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    views::page(
        "user",
        &json!({
            "title": "Edit profile",
            "user": identity,
            "form": form,
            "errors": errors,
        }),
    )
}
