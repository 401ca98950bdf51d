//! Form payloads, as posted by the HTML forms (`application/x-www-form-urlencoded`).
//!
//! Every field defaults to empty so that a missing input becomes a
//! validation message on the re-rendered form rather than a rejected request.

use serde::{Deserialize, Serialize};

/// Create/edit post form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub text: String,
    /// `datetime-local` value, e.g. `2026-10-16T09:30`. Interpreted as UTC.
    pub pub_date: String,
    /// Category id; empty for none.
    pub category: String,
    /// Location id; empty for none.
    pub location: String,
    /// Checkbox, present only when ticked.
    pub is_published: Option<String>,
}

impl PostForm {
    pub fn is_published(&self) -> bool {
        self.is_published.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub text: String,
}

/// Edit-profile form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

/// Sign-up form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Where to go after signing in.
    pub next: Option<String>,
}

/// `?page=N` on listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// `?next=/path` on the login page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}
