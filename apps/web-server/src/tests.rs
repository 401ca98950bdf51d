//! End-to-end tests over the in-memory store.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use blogicum_core::domain::{Category, CommentDraft, Post, PostDraft, User};
use blogicum_core::ports::{AuthError, PasswordService, TokenService};
use blogicum_infra::{InMemoryDatabase, JwtConfig, JwtTokenService};
use blogicum_shared::dto::{CommentForm, LoginForm, PasswordChangeForm, PostForm, RegisterForm};

use crate::config::SessionConfig;
use crate::handlers::configure_routes;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::AppState;

/// Reversible stand-in so these tests do not pay for Argon2.
struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain${password}"))
    }
}

macro_rules! blog_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

struct Fixture {
    db: Arc<InMemoryDatabase>,
    state: AppState,
    travel: Category,
}

async fn fixture() -> Fixture {
    let db = InMemoryDatabase::new();
    let travel = Category::new("Travel", "travel");
    db.put(travel.clone()).await;

    let tokens = JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        ..JwtConfig::default()
    });
    let state = AppState::from_parts(
        db.repositories(),
        Arc::new(tokens),
        Arc::new(PlainPasswords),
        10,
        SessionConfig::default(),
    );

    Fixture { db, state, travel }
}

impl Fixture {
    /// A stored user and a session cookie for them.
    async fn user(&self, username: &str) -> (User, Cookie<'static>) {
        let user = User::new(username.to_string(), String::new(), "plain$secret".into());
        self.db.put(user.clone()).await;
        let token = self.state.tokens.generate_token(user.id, username).unwrap();
        (user, Cookie::new(SESSION_COOKIE, token))
    }

    async fn post(&self, author: &User, title: &str, offset: TimeDelta, published: bool) -> Post {
        let draft = PostDraft {
            title: title.to_string(),
            text: format!("{title} body"),
            pub_date: Utc::now() + offset,
            category_id: Some(self.travel.id),
            location_id: None,
            is_published: published,
        };
        self.state.blog.create_post(author.id, draft).await.unwrap()
    }

    fn post_form(&self, title: &str) -> PostForm {
        PostForm {
            title: title.to_string(),
            text: "Body".to_string(),
            pub_date: "2020-01-01T10:00".to_string(),
            category: self.travel.id.to_string(),
            location: String::new(),
            is_published: Some("on".to_string()),
        }
    }

    async fn title_of(&self, post: &Post) -> String {
        let detail = self.state.blog.post_detail(post.id, Some(post.author_id)).await.unwrap();
        detail.summary.post.title
    }
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_text(resp: actix_web::dev::ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

#[actix_web::test]
async fn test_anonymous_create_redirects_to_login() {
    let f = fixture().await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::get().uri("/posts/create/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=%2Fposts%2Fcreate%2F");

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .set_form(f.post_form("Sneaky"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(f.state.blog.index(1).await.unwrap().items.is_empty());
}

#[actix_web::test]
async fn test_anonymous_comment_redirects_to_login() {
    let f = fixture().await;
    let (alice, _) = f.user("alice").await;
    let post = f.post(&alice, "Lisbon", TimeDelta::hours(-1), true).await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .set_form(CommentForm { text: "Hi".into() })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/auth/login/?next="));
    let detail = f.state.blog.post_detail(post.id, None).await.unwrap();
    assert!(detail.comments.is_empty());
}

#[actix_web::test]
async fn test_stranger_cannot_edit_or_delete_post() {
    let f = fixture().await;
    let (alice, _) = f.user("alice").await;
    let (_, bob_session) = f.user("bob").await;
    let post = f.post(&alice, "Lisbon", TimeDelta::hours(-1), true).await;
    let app = blog_app!(f.state);
    let detail_url = format!("/posts/{}/", post.id);

    for uri in [format!("/posts/{}/edit/", post.id), format!("/posts/{}/delete/", post.id)] {
        let req = test::TestRequest::get()
            .uri(&uri)
            .cookie(bob_session.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), detail_url);
    }

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(bob_session.clone())
        .set_form(f.post_form("Hijacked"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail_url);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", post.id))
        .cookie(bob_session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail_url);

    assert_eq!(f.title_of(&post).await, "Lisbon");
}

#[actix_web::test]
async fn test_author_edits_and_deletes_post() {
    let f = fixture().await;
    let (alice, session) = f.user("alice").await;
    let post = f.post(&alice, "Lisbon", TimeDelta::hours(-1), true).await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(session.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("value=\"Lisbon\""));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(session.clone())
        .set_form(f.post_form("Porto"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    assert_eq!(f.title_of(&post).await, "Porto");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", post.id))
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");
    assert!(f.state.blog.post_detail(post.id, Some(alice.id)).await.is_err());
}

#[actix_web::test]
async fn test_stranger_cannot_edit_or_delete_comment() {
    let f = fixture().await;
    let (alice, _) = f.user("alice").await;
    let (bob, _) = f.user("bob").await;
    let (_, carol_session) = f.user("carol").await;
    let post = f.post(&alice, "Lisbon", TimeDelta::hours(-1), true).await;
    let comment = f
        .state
        .blog
        .add_comment(post.id, bob.id, CommentDraft::new("Lovely"))
        .await
        .unwrap();
    let app = blog_app!(f.state);
    let detail_url = format!("/posts/{}/", post.id);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit_comment/{}/", post.id, comment.id))
        .cookie(carol_session.clone())
        .set_form(CommentForm { text: "Spam".into() })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail_url);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete_comment/{}/", post.id, comment.id))
        .cookie(carol_session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail_url);

    let detail = f.state.blog.post_detail(post.id, None).await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].comment.text, "Lovely");
}

#[actix_web::test]
async fn test_comment_lifecycle() {
    let f = fixture().await;
    let (alice, _) = f.user("alice").await;
    let (_, bob_session) = f.user("bob").await;
    let post = f.post(&alice, "Lisbon", TimeDelta::hours(-1), true).await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .cookie(bob_session.clone())
        .set_form(CommentForm { text: "First!".into() })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let comment_id = f.state.blog.post_detail(post.id, None).await.unwrap().comments[0]
        .comment
        .id;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit_comment/{}/", post.id, comment_id))
        .cookie(bob_session.clone())
        .set_form(CommentForm { text: "Second thoughts".into() })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("Second thoughts"));
    assert!(!body.contains("First!"));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete_comment/{}/", post.id, comment_id))
        .cookie(bob_session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(f.state.blog.post_detail(post.id, None).await.unwrap().comments.is_empty());
}

#[actix_web::test]
async fn test_empty_comment_rerenders_form() {
    let f = fixture().await;
    let (alice, session) = f.user("alice").await;
    let post = f.post(&alice, "Lisbon", TimeDelta::hours(-1), true).await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .cookie(session)
        .set_form(CommentForm { text: "  ".into() })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("This field is required."));
}

#[actix_web::test]
async fn test_index_hides_unpublished_posts_and_counts_comments() {
    let f = fixture().await;
    let (alice, _) = f.user("alice").await;
    let visible = f.post(&alice, "Sunrise over Lisbon", TimeDelta::hours(-1), true).await;
    f.post(&alice, "Unfinished draft", TimeDelta::hours(-1), false).await;
    f.post(&alice, "Future trip", TimeDelta::days(2), true).await;
    for text in ["One", "Two"] {
        f.state
            .blog
            .add_comment(visible.id, alice.id, CommentDraft::new(text))
            .await
            .unwrap();
    }
    let app = blog_app!(f.state);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_text(resp).await;
    assert!(body.contains("Sunrise over Lisbon"));
    assert!(body.contains("Comments: 2"));
    assert!(!body.contains("Unfinished draft"));
    assert!(!body.contains("Future trip"));
}

#[actix_web::test]
async fn test_profile_shows_hidden_posts_to_author_only() {
    let f = fixture().await;
    let (alice, alice_session) = f.user("alice").await;
    let (_, bob_session) = f.user("bob").await;
    f.post(&alice, "Unfinished draft", TimeDelta::hours(-1), false).await;
    f.post(&alice, "Sunrise over Lisbon", TimeDelta::hours(-1), true).await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::get()
        .uri("/profile/alice/")
        .cookie(alice_session)
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("Unfinished draft"));
    assert!(body.contains("Hidden from readers"));

    let req = test::TestRequest::get()
        .uri("/profile/alice/")
        .cookie(bob_session)
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("Sunrise over Lisbon"));
    assert!(!body.contains("Unfinished draft"));

    let req = test::TestRequest::get().uri("/profile/nobody/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_hidden_post_detail_is_not_found_for_strangers() {
    let f = fixture().await;
    let (alice, alice_session) = f.user("alice").await;
    let (_, bob_session) = f.user("bob").await;
    let post = f.post(&alice, "Future trip", TimeDelta::days(2), true).await;
    let app = blog_app!(f.state);
    let uri = format!("/posts/{}/", post.id);

    let req = test::TestRequest::get().uri(&uri).cookie(bob_session.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("Page not found"));

    let req = test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri(&uri).cookie(alice_session).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Future trip"));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .cookie(bob_session)
        .set_form(CommentForm { text: "Early bird".into() })
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_post_redirects_to_profile() {
    let f = fixture().await;
    let (_, session) = f.user("alice").await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .cookie(session)
        .set_form(f.post_form("Harbour walk"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/alice/");

    let index = f.state.blog.index(1).await.unwrap();
    assert_eq!(index.items.len(), 1);
    assert_eq!(index.items[0].author, "alice");
    assert_eq!(index.items[0].post.title, "Harbour walk");
}

#[actix_web::test]
async fn test_redirects_follow_renamed_author() {
    let f = fixture().await;
    let (mut alice, session) = f.user("alice").await;
    alice.username = "alice_l".into();
    f.db.put(alice).await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .cookie(session.clone())
        .set_form(f.post_form("Harbour walk"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/alice_l/");

    let req = test::TestRequest::post()
        .uri("/auth/password_change/")
        .cookie(session)
        .set_form(PasswordChangeForm {
            old_password: "secret".into(),
            new_password1: "n3w-secret".into(),
            new_password2: "n3w-secret".into(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/alice_l/");
}

#[actix_web::test]
async fn test_invalid_post_form_is_shown_again() {
    let f = fixture().await;
    let (_, session) = f.user("alice").await;
    let app = blog_app!(f.state);

    let form = PostForm {
        title: String::new(),
        category: Uuid::new_v4().to_string(),
        ..f.post_form("")
    };
    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .cookie(session)
        .set_form(form)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("This field is required."));
    assert!(body.contains("Travel"));
    assert!(f.state.blog.index(1).await.unwrap().items.is_empty());
}

#[actix_web::test]
async fn test_listings_reject_unknown_category_and_pages() {
    let f = fixture().await;
    let app = blog_app!(f.state);

    for (uri, status) in [
        ("/", StatusCode::OK),
        ("/?page=1", StatusCode::OK),
        ("/?page=2", StatusCode::NOT_FOUND),
        ("/?page=abc", StatusCode::NOT_FOUND),
        ("/?page=18446744073709551615", StatusCode::NOT_FOUND),
        ("/category/travel/?page=18446744073709551615", StatusCode::NOT_FOUND),
        ("/category/travel/", StatusCode::OK),
        ("/category/unknown/", StatusCode::NOT_FOUND),
        ("/posts/not-a-uuid/", StatusCode::NOT_FOUND),
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), status, "GET {uri}");
    }
}

#[actix_web::test]
async fn test_registration_and_login_flow() {
    let f = fixture().await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_form(RegisterForm {
            username: "dora".into(),
            email: "dora@example.com".into(),
            password1: "long-enough".into(),
            password2: "long-enough".into(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/");

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form(LoginForm {
            username: "dora".into(),
            password: "wrong-password".into(),
            next: None,
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Please enter a correct username and password"));

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_form(LoginForm {
            username: "dora".into(),
            password: "long-enough".into(),
            next: Some("/posts/create/".into()),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/posts/create/");

    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("session cookie");
    assert!(session.http_only().unwrap_or(false));

    let req = test::TestRequest::get()
        .uri("/posts/create/")
        .cookie(Cookie::new(SESSION_COOKIE, session.value().to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_duplicate_registration_is_a_field_error() {
    let f = fixture().await;
    f.user("alice").await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_form(RegisterForm {
            username: "alice".into(),
            email: String::new(),
            password1: "long-enough".into(),
            password2: "long-enough".into(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("A user with that username already exists."));
}

#[actix_web::test]
async fn test_login_ignores_foreign_next() {
    let f = fixture().await;
    f.user("alice").await;
    let app = blog_app!(f.state);

    for next in ["https://evil.example/", "//evil.example", "/\t/evil.example"] {
        let req = test::TestRequest::post()
            .uri("/auth/login/")
            .set_form(LoginForm {
                username: "alice".into(),
                password: "secret".into(),
                next: Some(next.into()),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "/", "next={next:?}");
    }
}

#[actix_web::test]
async fn test_logout_clears_session() {
    let f = fixture().await;
    let (_, session) = f.user("alice").await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::post()
        .uri("/auth/logout/")
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("removal cookie");
    assert_eq!(cleared.value(), "");
}

#[actix_web::test]
async fn test_edit_profile_renames_user() {
    let f = fixture().await;
    let (alice, session) = f.user("alice").await;
    f.post(&alice, "Sunrise over Lisbon", TimeDelta::hours(-1), true).await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::post()
        .uri("/edit_profile/")
        .cookie(session)
        .set_form(blogicum_shared::dto::ProfileForm {
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
            username: "alice_l".into(),
            email: "alice@example.com".into(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(resp.response().cookies().any(|c| c.name() == SESSION_COOKIE));

    let req = test::TestRequest::get().uri("/profile/alice_l/").to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("Alice Liddell"));
    assert!(body.contains("Sunrise over Lisbon"));
}

#[actix_web::test]
async fn test_bearer_token_is_accepted() {
    let f = fixture().await;
    let (alice, _) = f.user("alice").await;
    let token = f.state.tokens.generate_token(alice.id, "alice").unwrap();
    let app = blog_app!(f.state);

    let req = test::TestRequest::get()
        .uri("/posts/create/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_health_check() {
    let f = fixture().await;
    let app = blog_app!(f.state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
}
