//! Page rendering: the embedded handlebars templates and their view models.

use std::sync::LazyLock;

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use chrono::{DateTime, Utc};
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;
use uuid::Uuid;

use blogicum_core::domain::{
    Category, CommentView, Location, Page, PostSummary, is_publicly_visible,
};
use blogicum_shared::ErrorResponse;

use crate::middleware::error::{AppError, AppResult};

const PARTIALS: [(&str, &str); 4] = [
    ("header", include_str!("../templates/partials/header.hbs")),
    ("footer", include_str!("../templates/partials/footer.hbs")),
    ("post_list", include_str!("../templates/partials/post_list.hbs")),
    ("field_errors", include_str!("../templates/partials/field_errors.hbs")),
];

const PAGES: [(&str, &str); 12] = [
    ("index", include_str!("../templates/blog/index.hbs")),
    ("category", include_str!("../templates/blog/category.hbs")),
    ("profile", include_str!("../templates/blog/profile.hbs")),
    ("detail", include_str!("../templates/blog/detail.hbs")),
    ("create", include_str!("../templates/blog/create.hbs")),
    ("comment", include_str!("../templates/blog/comment.hbs")),
    ("confirm_delete", include_str!("../templates/blog/confirm_delete.hbs")),
    ("user", include_str!("../templates/blog/user.hbs")),
    ("registration", include_str!("../templates/registration/registration_form.hbs")),
    ("login", include_str!("../templates/registration/login.hbs")),
    ("password_change", include_str!("../templates/registration/password_change.hbs")),
    ("error", include_str!("../templates/pages/error.hbs")),
];

static TEMPLATES: LazyLock<Result<Handlebars<'static>, TemplateError>> = LazyLock::new(|| {
    let mut registry = Handlebars::new();
    for (name, source) in PARTIALS {
        registry.register_partial(name, source)?;
    }
    for (name, source) in PAGES {
        registry.register_template_string(name, source)?;
    }
    Ok(registry)
});

/// Compile the templates up front so a broken one fails startup.
pub fn check_templates() -> Result<(), String> {
    TEMPLATES
        .as_ref()
        .map(|_| ())
        .map_err(|e| format!("template error: {e}"))
}

pub fn render(name: &str, context: &impl Serialize) -> AppResult<String> {
    let registry = TEMPLATES
        .as_ref()
        .map_err(|e| AppError::Internal(format!("template error: {e}")))?;
    registry
        .render(name, context)
        .map_err(|e| AppError::Internal(format!("rendering {name}: {e}")))
}

/// `200 OK` with the rendered page.
pub fn page(name: &str, context: &impl Serialize) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render(name, context)?))
}

/// Body of an error page. Falls back to plain text if rendering fails.
pub fn error_page(problem: &ErrorResponse) -> String {
    render("error", &serde_json::json!({ "title": problem.title, "problem": problem }))
        .unwrap_or_else(|_| format!("{} {}", problem.status, problem.title))
}

/// A post as shown on listings and the detail page.
#[derive(Debug, Serialize)]
pub struct PostCard {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: String,
    pub author: String,
    pub category: Option<CategoryLink>,
    pub location: Option<String>,
    pub comment_count: u64,
    /// Only the author ever sees a hidden post; the flag drives a badge.
    pub is_hidden: bool,
    pub is_owner: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoryLink {
    pub title: String,
    pub slug: String,
}

impl PostCard {
    pub fn new(summary: PostSummary, viewer: Option<Uuid>, now: DateTime<Utc>) -> Self {
        let PostSummary {
            post,
            author,
            category,
            location,
            comment_count,
        } = summary;

        Self {
            id: post.id,
            is_hidden: !is_publicly_visible(&post, category.as_ref(), now),
            is_owner: viewer == Some(post.author_id),
            title: post.title,
            text: post.text,
            pub_date: display_datetime(post.pub_date),
            author,
            category: category
                .filter(|c| c.is_published)
                .map(|c| CategoryLink {
                    title: c.title,
                    slug: c.slug,
                }),
            location: location.filter(|l| l.is_published).map(|l| l.name),
            comment_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentCard {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub created_at: String,
    pub is_owner: bool,
}

impl CommentCard {
    pub fn new(view: CommentView, viewer: Option<Uuid>) -> Self {
        Self {
            id: view.comment.id,
            is_owner: viewer == Some(view.comment.author_id),
            created_at: display_datetime(view.comment.created_at),
            text: view.comment.text,
            author: view.author,
        }
    }
}

/// One page of post cards with its navigation.
#[derive(Debug, Serialize)]
pub struct Listing {
    pub posts: Vec<PostCard>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub number: u64,
    pub total_pages: u64,
    pub previous: Option<u64>,
    pub next: Option<u64>,
}

impl Listing {
    pub fn new(page: Page<PostSummary>, viewer: Option<Uuid>) -> Self {
        let now = Utc::now();
        let pagination = Pagination {
            number: page.number,
            total_pages: page.total_pages.max(1),
            previous: page.has_previous().then(|| page.number - 1),
            next: page.has_next().then(|| page.number + 1),
        };
        Self {
            posts: page
                .items
                .into_iter()
                .map(|summary| PostCard::new(summary, viewer, now))
                .collect(),
            pagination,
        }
    }
}

/// An `<option>` of a select box.
#[derive(Debug, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    /// Options headed by the empty "no choice" entry.
    fn list(choices: impl Iterator<Item = (Uuid, String)>, selected: &str) -> Vec<Self> {
        let blank = SelectOption {
            value: String::new(),
            label: "---------".to_string(),
            selected: selected.is_empty(),
        };
        std::iter::once(blank)
            .chain(choices.map(|(id, label)| {
                let value = id.to_string();
                SelectOption {
                    selected: value == selected,
                    value,
                    label,
                }
            }))
            .collect()
    }

    pub fn categories(categories: Vec<Category>, selected: &str) -> Vec<Self> {
        Self::list(categories.into_iter().map(|c| (c.id, c.title)), selected)
    }

    pub fn locations(locations: Vec<Location>, selected: &str) -> Vec<Self> {
        Self::list(locations.into_iter().map(|l| (l.id, l.name)), selected)
    }
}

fn display_datetime(at: DateTime<Utc>) -> String {
    at.format("%d %B %Y, %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogicum_core::domain::{PageRequest, Post, PostDraft};

    fn summary(category: Option<Category>) -> PostSummary {
        let draft = PostDraft {
            title: "<b>Alps</b>".to_string(),
            text: "Snow".to_string(),
            pub_date: Utc::now() - chrono::Duration::hours(1),
            category_id: category.as_ref().map(|c| c.id),
            location_id: None,
            is_published: true,
        };
        PostSummary {
            post: Post::new(Uuid::new_v4(), draft),
            author: "alice".to_string(),
            category,
            location: None,
            comment_count: 3,
        }
    }

    #[test]
    fn test_templates_compile() {
        assert!(check_templates().is_ok());
    }

    #[test]
    fn test_post_card_flags() {
        let card = PostCard::new(summary(Some(Category::new("Travel", "travel"))), None, Utc::now());
        assert!(!card.is_hidden);
        assert!(!card.is_owner);
        assert_eq!(card.category.unwrap().slug, "travel");

        let card = PostCard::new(summary(None), None, Utc::now());
        assert!(card.is_hidden);
    }

    #[test]
    fn test_rendering_escapes_html() {
        let page = Page::from_vec(vec![summary(Some(Category::new("Travel", "travel")))], PageRequest::first(10));
        let html = render(
            "index",
            &serde_json::json!({ "title": "Blogicum", "listing": Listing::new(page, None) }),
        )
        .unwrap();

        assert!(html.contains("&lt;b&gt;Alps&lt;/b&gt;"));
        assert!(!html.contains("<b>Alps</b>"));
    }

    #[test]
    fn test_select_marks_current_choice() {
        let travel = Category::new("Travel", "travel");
        let selected = travel.id.to_string();
        let options = SelectOption::categories(vec![travel], &selected);

        assert_eq!(options.len(), 2);
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }

    #[test]
    fn test_error_page_shows_status() {
        let html = error_page(&ErrorResponse::not_found("No post"));
        assert!(html.contains("404"));
        assert!(html.contains("Page not found"));
    }
}
