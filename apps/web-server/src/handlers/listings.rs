//! Post listings: the front page, a category and a user's profile.

use actix_web::{HttpResponse, web};
use serde_json::json;

use blogicum_shared::dto::PageQuery;

use super::page_number;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views::{self, Listing};

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let posts = state.blog.index(page_number(&query)?).await?;

    views::page(
        "index",
        &json!({
            "title": "Latest posts",
            "user": viewer.0,
            "listing": Listing::new(posts, viewer.user_id()),
        }),
    )
}

/// GET /category/{slug}/
pub async fn category_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (category, posts) = state
        .blog
        .category_posts(&slug, page_number(&query)?)
        .await?;

    views::page(
        "category",
        &json!({
            "title": category.title,
            "user": viewer.0,
            "category": category,
            "listing": Listing::new(posts, viewer.user_id()),
        }),
    )
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (user, posts) = state
        .blog
        .profile(&username, viewer.user_id(), page_number(&query)?)
        .await?;

    views::page(
        "profile",
        &json!({
            "title": user.username,
            "user": viewer.0,
            "is_own_profile": viewer.user_id() == Some(user.id),
            "profile": {
                "username": user.username,
                "display_name": user.display_name(),
                "joined": user.created_at.format("%d %B %Y").to_string(),
            },
            "listing": Listing::new(posts, viewer.user_id()),
        }),
    )
}
