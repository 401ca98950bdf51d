//! HTTP handlers and route configuration.

mod accounts;
mod comments;
mod health;
mod listings;
mod posts;

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_shared::dto::PageQuery;

use crate::middleware::error::{AppError, AppResult, redirect_response};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/", web::get().to(listings::index))
        .route("/category/{slug}/", web::get().to(listings::category_posts))
        .route("/profile/{username}/", web::get().to(listings::profile))
        .service(
            web::resource("/edit_profile/")
                .route(web::get().to(accounts::edit_profile_form))
                .route(web::post().to(accounts::edit_profile)),
        )
        .service(
            web::scope("/posts")
                .service(
                    web::resource("/create/")
                        .route(web::get().to(posts::create_form))
                        .route(web::post().to(posts::create)),
                )
                .route("/{post_id}/", web::get().to(posts::detail))
                .service(
                    web::resource("/{post_id}/edit/")
                        .route(web::get().to(posts::edit_form))
                        .route(web::post().to(posts::edit)),
                )
                .service(
                    web::resource("/{post_id}/delete/")
                        .route(web::get().to(posts::delete_confirm))
                        .route(web::post().to(posts::delete)),
                )
                .route("/{post_id}/comment/", web::post().to(comments::add))
                .service(
                    web::resource("/{post_id}/edit_comment/{comment_id}/")
                        .route(web::get().to(comments::edit_form))
                        .route(web::post().to(comments::edit)),
                )
                .service(
                    web::resource("/{post_id}/delete_comment/{comment_id}/")
                        .route(web::get().to(comments::delete_confirm))
                        .route(web::post().to(comments::delete)),
                ),
        )
        .service(
            web::scope("/auth")
                .service(
                    web::resource("/registration/")
                        .route(web::get().to(accounts::registration_form))
                        .route(web::post().to(accounts::register)),
                )
                .service(
                    web::resource("/login/")
                        .route(web::get().to(accounts::login_form))
                        .route(web::post().to(accounts::login)),
                )
                .route("/logout/", web::post().to(accounts::logout))
                .service(
                    web::resource("/password_change/")
                        .route(web::get().to(accounts::password_change_form))
                        .route(web::post().to(accounts::change_password)),
                ),
        );
}

/// `?page=N`, 1 when absent. Anything but a positive number is a 404.
fn page_number(query: &PageQuery) -> AppResult<u64> {
    match query.page.as_deref().map(str::trim) {
        None | Some("") => Ok(1),
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| AppError::NotFound(format!("Invalid page {:?}", raw))),
    }
}

fn post_url(post_id: Uuid) -> String {
    format!("/posts/{}/", post_id)
}

fn profile_url(username: &str) -> String {
    format!("/profile/{}/", username)
}

fn redirect(location: &str) -> AppResult<HttpResponse> {
    Ok(redirect_response(location))
}
