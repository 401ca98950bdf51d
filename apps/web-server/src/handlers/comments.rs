//! Comment pages. Only the comment's author may edit or delete it.

use actix_web::{HttpResponse, web};
use serde_json::json;
use uuid::Uuid;

use blogicum_core::domain::ValidationErrors;
use blogicum_core::error::DomainError;
use blogicum_shared::dto::CommentForm;

use super::{post_url, redirect};
use crate::forms;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views;

/// POST /posts/{post_id}/comment/
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = post_id.into_inner();
    let result = match forms::comment_draft(&form) {
        Ok(draft) => state
            .blog
            .add_comment(post_id, identity.user_id, draft)
            .await
            .map(|_| ()),
        Err(errors) => Err(errors.into()),
    };

    match result {
        Ok(()) => redirect(&post_url(post_id)),
        Err(DomainError::Validation(errors)) => {
            // The post must still be readable before its form is re-shown.
            state.blog.post_detail(post_id, Some(identity.user_id)).await?;
            render_form(&identity, post_id, None, &form, &errors)
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /posts/{post_id}/edit_comment/{comment_id}/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .blog
        .comment_for_edit(post_id, comment_id, identity.user_id)
        .await
        .map_err(|e| AppError::or_redirect(e, post_url(post_id)))?;

    let form = CommentForm { text: comment.text };
    render_form(&identity, post_id, Some(comment_id), &form, &ValidationErrors::new())
}

/// POST /posts/{post_id}/edit_comment/{comment_id}/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .blog
        .comment_for_edit(post_id, comment_id, identity.user_id)
        .await
        .map_err(|e| AppError::or_redirect(e, post_url(post_id)))?;

    let result = match forms::comment_draft(&form) {
        Ok(draft) => state
            .blog
            .update_comment(post_id, comment_id, identity.user_id, draft)
            .await
            .map(|_| ()),
        Err(errors) => Err(errors.into()),
    };

    match result {
        Ok(()) => redirect(&post_url(post_id)),
        Err(DomainError::Validation(errors)) => {
            render_form(&identity, post_id, Some(comment_id), &form, &errors)
        }
        Err(e) => Err(AppError::or_redirect(e, post_url(post_id))),
    }
}

/// GET /posts/{post_id}/delete_comment/{comment_id}/
pub async fn delete_confirm(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .blog
        .comment_for_edit(post_id, comment_id, identity.user_id)
        .await
        .map_err(|e| AppError::or_redirect(e, post_url(post_id)))?;

    views::page(
        "confirm_delete",
        &json!({
            "title": "Delete comment",
            "user": identity,
            "heading": "Delete this comment?",
            "subject": comment.text,
            "action": format!("/posts/{}/delete_comment/{}/", post_id, comment_id),
            "cancel": post_url(post_id),
        }),
    )
}

/// POST /posts/{post_id}/delete_comment/{comment_id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .blog
        .delete_comment(post_id, comment_id, identity.user_id)
        .await
        .map_err(|e| AppError::or_redirect(e, post_url(post_id)))?;

    redirect(&post_url(post_id))
}

/// Comment form for a new comment (`comment_id` empty) or an existing one.
fn render_form(
    identity: &Identity,
    post_id: Uuid,
    comment_id: Option<Uuid>,
    form: &CommentForm,
    errors: &ValidationErrors,
) -> AppResult<HttpResponse> {
    let (title, action) = match comment_id {
        Some(id) => (
            "Edit comment",
            format!("/posts/{}/edit_comment/{}/", post_id, id),
        ),
        None => ("Add comment", format!("/posts/{}/comment/", post_id)),
    };

    views::page(
        "comment",
        &json!({
            "title": title,
            "user": identity,
            "post_id": post_id,
            "action": action,
            "form": form,
            "errors": errors,
        }),
    )
}
