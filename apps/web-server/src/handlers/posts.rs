//! Post detail and the author's create/edit/delete pages.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use blogicum_core::domain::ValidationErrors;
use blogicum_core::error::DomainError;
use blogicum_shared::dto::PostForm;

use super::{post_url, profile_url, redirect};
use crate::forms;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{self, CommentCard, PostCard, SelectOption};

/// GET /posts/{post_id}/
pub async fn detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state.blog.post_detail(*post_id, viewer.user_id()).await?;
    let comments: Vec<CommentCard> = detail
        .comments
        .into_iter()
        .map(|view| CommentCard::new(view, viewer.user_id()))
        .collect();

    views::page(
        "detail",
        &json!({
            "title": detail.summary.post.title,
            "user": viewer.0,
            "post": PostCard::new(detail.summary, viewer.user_id(), Utc::now()),
            "comments": comments,
        }),
    )
}

/// GET /posts/create/
pub async fn create_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let form = forms::new_post_form();
    render_form(&state, &identity, None, &form, &ValidationErrors::new()).await
}

/// POST /posts/create/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let result = match forms::post_draft(&form) {
        Ok(draft) => state.blog.create_post(identity.user_id, draft).await,
        Err(errors) => Err(errors.into()),
    };

    match result {
        Ok(_) => {
            // The session token may predate a username change.
            let author = state.accounts.find(identity.user_id).await?;
            redirect(&profile_url(&author.username))
        }
        Err(DomainError::Validation(errors)) => {
            render_form(&state, &identity, None, &form, &errors).await
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    let post = state
        .blog
        .post_for_edit(post_id, identity.user_id)
        .await
        .map_err(|e| AppError::or_redirect(e, post_url(post_id)))?;

    let form = forms::post_form(&post);
    render_form(&state, &identity, Some(post_id), &form, &ValidationErrors::new()).await
}

/// POST /posts/{post_id}/edit/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<Uuid>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    // Ownership is checked before the form so strangers are never shown it.
    state
        .blog
        .post_for_edit(post_id, identity.user_id)
        .await
        .map_err(|e| AppError::or_redirect(e, post_url(post_id)))?;

    let result = match forms::post_draft(&form) {
        Ok(draft) => state.blog.update_post(post_id, identity.user_id, draft).await,
        Err(errors) => Err(errors.into()),
    };

    match result {
        Ok(_) => redirect(&post_url(post_id)),
        Err(DomainError::Validation(errors)) => {
            render_form(&state, &identity, Some(post_id), &form, &errors).await
        }
        Err(e) => Err(AppError::or_redirect(e, post_url(post_id))),
    }
}

/// GET /posts/{post_id}/delete/
pub async fn delete_confirm(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    let post = state
        .blog
        .post_for_edit(post_id, identity.user_id)
        .await
        .map_err(|e| AppError::or_redirect(e, post_url(post_id)))?;

    views::page(
        "confirm_delete",
        &json!({
            "title": "Delete post",
            "user": identity,
            "heading": "Delete this post?",
            "subject": post.title,
            "action": format!("/posts/{}/delete/", post_id),
            "cancel": post_url(post_id),
        }),
    )
}

/// POST /posts/{post_id}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    state
        .blog
        .delete_post(post_id, identity.user_id)
        .await
        .map_err(|e| AppError::or_redirect(e, post_url(post_id)))?;

    redirect("/")
}

/// The post form, blank, prefilled or re-shown with errors.
async fn render_form(
    state: &AppState,
    identity: &Identity,
    post_id: Option<Uuid>,
    form: &PostForm,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    let (categories, locations) = state.blog.publishing_options().await?;
    let (heading, action) = match post_id {
        Some(id) => ("Edit post", format!("/posts/{}/edit/", id)),
        None => ("New post", "/posts/create/".to_string()),
    };

    views::page(
        "create",
        &json!({
            "title": heading,
            "heading": heading,
            "action": action,
            "user": identity,
            "form": form,
            "errors": errors,
            "categories": SelectOption::categories(categories, &form.category),
            "locations": SelectOption::locations(locations, &form.location),
        }),
    )
}
