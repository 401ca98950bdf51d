//! Conversion of submitted forms into domain drafts, and back for prefilling.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use blogicum_core::domain::{
    CommentDraft, PasswordChange, Post, PostDraft, ProfileChanges, Registration, User,
    ValidationErrors,
};
use blogicum_shared::dto::{CommentForm, PasswordChangeForm, PostForm, ProfileForm, RegisterForm};

/// Formats accepted for `pub_date`, the first matching the
/// `datetime-local` input.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a post form. Field errors from parsing and from the draft's own
/// rules are reported together.
pub fn post_draft(form: &PostForm) -> Result<PostDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let pub_date = parse_datetime(&form.pub_date);
    if pub_date.is_none() {
        errors.add("pub_date", "Enter a valid date/time.");
    }
    let category_id = parse_choice(&mut errors, "category", &form.category);
    let location_id = parse_choice(&mut errors, "location", &form.location);

    let draft = PostDraft {
        title: form.title.trim().to_string(),
        text: form.text.trim().to_string(),
        pub_date: pub_date.unwrap_or_else(Utc::now),
        category_id,
        location_id,
        is_published: form.is_published(),
    };
    if let Err(draft_errors) = draft.validate() {
        errors.merge(draft_errors);
    }

    errors.into_result().map(|()| draft)
}

/// A blank post form: published, dated now.
pub fn new_post_form() -> PostForm {
    PostForm {
        pub_date: format_datetime_local(Utc::now()),
        is_published: Some("on".to_string()),
        ..PostForm::default()
    }
}

/// A post form prefilled from an existing post.
pub fn post_form(post: &Post) -> PostForm {
    let draft = PostDraft::from_post(post);
    PostForm {
        title: draft.title,
        text: draft.text,
        pub_date: format_datetime_local(draft.pub_date),
        category: draft.category_id.map(|id| id.to_string()).unwrap_or_default(),
        location: draft.location_id.map(|id| id.to_string()).unwrap_or_default(),
        is_published: draft.is_published.then(|| "on".to_string()),
    }
}

pub fn comment_draft(form: &CommentForm) -> Result<CommentDraft, ValidationErrors> {
    let draft = CommentDraft::new(form.text.trim());
    draft.validate().map(|()| draft)
}

pub fn registration(form: &RegisterForm) -> Registration {
    Registration {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        password1: form.password1.clone(),
        password2: form.password2.clone(),
    }
}

pub fn profile_changes(form: &ProfileForm) -> ProfileChanges {
    ProfileChanges {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
    }
}

pub fn profile_form(user: &User) -> ProfileForm {
    let changes = ProfileChanges::from_user(user);
    ProfileForm {
        first_name: changes.first_name,
        last_name: changes.last_name,
        username: changes.username,
        email: changes.email,
    }
}

pub fn password_change(form: &PasswordChangeForm) -> PasswordChange {
    PasswordChange {
        old_password: form.old_password.clone(),
        new_password1: form.new_password1.clone(),
        new_password2: form.new_password2.clone(),
    }
}

/// Value for a `datetime-local` input, in UTC.
pub fn format_datetime_local(at: DateTime<Utc>) -> String {
    at.format(DATETIME_FORMATS[0]).to_string()
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Empty select means "none"; anything else must be an id.
fn parse_choice(errors: &mut ValidationErrors, field: &str, value: &str) -> Option<Uuid> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match Uuid::parse_str(value) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "Select a valid choice.");
            None
        }
    }
}
