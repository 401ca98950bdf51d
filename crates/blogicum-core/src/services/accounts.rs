//! Sign-up, sign-in and profile maintenance.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{PasswordChange, ProfileChanges, Registration, User, ValidationErrors};
use crate::error::DomainError;
use crate::ports::{PasswordService, UserRepository};

type Result<T> = std::result::Result<T, DomainError>;

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    pub async fn register(&self, registration: Registration) -> Result<User> {
        registration.validate()?;
        self.ensure_username_free(&registration.username, None).await?;

        let password_hash = self.hash(&registration.password1)?;
        let user = User::new(registration.username, registration.email, password_hash);
        let user = self.users.create(user).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials. Unknown users and wrong passwords look the same.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if !self.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn find(&self, user_id: Uuid) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    pub async fn update_profile(&self, user_id: Uuid, changes: ProfileChanges) -> Result<User> {
        changes.validate()?;
        let mut user = self.find(user_id).await?;
        if changes.username != user.username {
            self.ensure_username_free(&changes.username, Some(user.id))
                .await?;
        }

        user.apply(changes);
        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    pub async fn change_password(&self, user_id: Uuid, change: PasswordChange) -> Result<User> {
        change.validate()?;
        let mut user = self.find(user_id).await?;
        if !self.verify(&change.old_password, &user.password_hash)? {
            return Err(ValidationErrors::single(
                "old_password",
                "Your old password was entered incorrectly. Please enter it again.",
            )
            .into());
        }

        user.password_hash = self.hash(&change.new_password1)?;
        user.updated_at = Utc::now();
        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, "Password changed");
        Ok(user)
    }

    async fn ensure_username_free(&self, username: &str, owner: Option<Uuid>) -> Result<()> {
        match self.users.find_by_username(username).await? {
            Some(existing) if Some(existing.id) != owner => Err(ValidationErrors::single(
                "username",
                "A user with that username already exists.",
            )
            .into()),
            _ => Ok(()),
        }
    }

    fn hash(&self, password: &str) -> Result<String> {
        self.passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        self.passwords
            .verify(password, hash)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}
