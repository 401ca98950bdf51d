use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationErrors;

pub const USERNAME_MAX_LEN: usize = 150;
pub const PASSWORD_MIN_LEN: usize = 8;

/// User entity - an account that can author posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            first_name: String::new(),
            last_name: String::new(),
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// "First Last", falling back to the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn apply(&mut self, changes: ProfileChanges) {
        self.first_name = changes.first_name;
        self.last_name = changes.last_name;
        self.username = changes.username;
        self.email = changes.email;
        self.updated_at = Utc::now();
    }
}

/// Sign-up request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_username(&mut errors, &self.username);
        validate_email(&mut errors, &self.email);
        validate_new_password(&mut errors, "password", &self.password1, &self.password2);
        errors.into_result()
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

impl ProfileChanges {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_username(&mut errors, &self.username);
        validate_email(&mut errors, &self.email);
        if self.first_name.chars().count() > USERNAME_MAX_LEN {
            errors.add("first_name", "Name is too long.");
        }
        if self.last_name.chars().count() > USERNAME_MAX_LEN {
            errors.add("last_name", "Name is too long.");
        }
        errors.into_result()
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

impl PasswordChange {
    /// Checks the new password only; the old one is verified against the stored hash.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.old_password.is_empty() {
            errors.add("old_password", "This field is required.");
        }
        validate_new_password(
            &mut errors,
            "new_password",
            &self.new_password1,
            &self.new_password2,
        );
        errors.into_result()
    }
}

fn validate_username(errors: &mut ValidationErrors, username: &str) {
    errors.require_text("username", username, Some(USERNAME_MAX_LEN));
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.is_empty() && !username.chars().all(allowed) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
}

// Email is optional, but must look like an address when present.
fn validate_email(errors: &mut ValidationErrors, email: &str) {
    if email.is_empty() {
        return;
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) {
        errors.add("email", "Enter a valid email address.");
    }
}

fn validate_new_password(errors: &mut ValidationErrors, prefix: &str, first: &str, second: &str) {
    let field1 = format!("{prefix}1");
    let field2 = format!("{prefix}2");
    if first.chars().count() < PASSWORD_MIN_LEN {
        errors.add(
            &field1,
            format!("This password is too short. It must contain at least {PASSWORD_MIN_LEN} characters."),
        );
    }
    if first != second {
        errors.add(&field2, "The two password fields didn't match.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(username: &str, email: &str, p1: &str, p2: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: email.to_string(),
            password1: p1.to_string(),
            password2: p2.to_string(),
        }
    }

    #[test]
    fn test_registration_rules() {
        assert!(registration("alice", "", "long-enough", "long-enough").validate().is_ok());
        assert!(registration("a.b+c@d-e_f", "a@b.io", "long-enough", "long-enough").validate().is_ok());

        let errors = registration("bad name", "nope", "short", "other")
            .validate()
            .unwrap_err();
        assert!(errors.has("username"));
        assert!(errors.has("email"));
        assert!(errors.has("password1"));
        assert!(errors.has("password2"));
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut user = User::new("alice".into(), String::new(), "hash".into());
        assert_eq!(user.display_name(), "alice");

        user.first_name = "Alice".into();
        user.last_name = "Liddell".into();
        assert_eq!(user.display_name(), "Alice Liddell");
    }

    #[test]
    fn test_password_change_requires_old_password() {
        let change = PasswordChange {
            old_password: String::new(),
            new_password1: "new-password".into(),
            new_password2: "new-password".into(),
        };
        let errors = change.validate().unwrap_err();
        assert!(errors.has("old_password"));
        assert!(!errors.has("new_password2"));
    }
}
