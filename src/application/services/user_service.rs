//! User Service
//!
//! Handles user management operations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{User, UserRepository};
use crate::shared::error::AppError;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, user_id: i32) -> Result<UserDto, UserError>;

    /// Get user by username
    async fn get_user_by_username(&self, username: &str) -> Result<UserDto, UserError>;

    /// Register a user
    async fn create_user(&self, dto: CreateUserDto) -> Result<UserDto, UserError>;

    /// Apply a partial update
    async fn update_user(&self, user_id: i32, update: UpdateUserDto) -> Result<UserDto, UserError>;

    /// Delete user account
    async fn delete_user(&self, user_id: i32) -> Result<(), UserError>;
}

/// User data transfer object
#[derive(Debug, Clone, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            full_name: user.full_name(),
            is_active: user.is_active(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Create user input
#[derive(Debug, Clone, Default)]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Update user input; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for UserError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Validation(msg) => UserError::Validation(msg),
            AppError::NotFound(_) => UserError::NotFound,
            // Repositories report which unique column collided
            AppError::Conflict(msg) if msg.starts_with("Email") => UserError::EmailTaken,
            AppError::Conflict(_) => UserError::UsernameTaken,
            e => UserError::Internal(e.to_string()),
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl<U>
where
    U: UserRepository + ?Sized,
{
    user_repo: Arc<U>,
}

impl<U> UserServiceImpl<U>
where
    U: UserRepository + ?Sized,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Reject a username or email already owned by a different user.
    async fn ensure_unique(&self, user: &User) -> Result<(), UserError> {
        if let Some(existing) = self.user_repo.find_by_username(user.username()).await? {
            if existing.id() != user.id() {
                return Err(UserError::UsernameTaken);
            }
        }
        if let Some(existing) = self.user_repo.find_by_email(user.email()).await? {
            if existing.id() != user.id() {
                return Err(UserError::EmailTaken);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<U> UserService for UserServiceImpl<U>
where
    U: UserRepository + ?Sized + 'static,
{
    async fn get_user(&self, user_id: i32) -> Result<UserDto, UserError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound)?;

        Ok(UserDto::from(user))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<UserDto, UserError> {
        let user = self
            .user_repo
            .find_by_username(&username.trim().to_lowercase())
            .await?
            .ok_or(UserError::NotFound)?;

        Ok(UserDto::from(user))
    }

    async fn create_user(&self, dto: CreateUserDto) -> Result<UserDto, UserError> {
        let user = User::new(
            &dto.username,
            &dto.email,
            dto.first_name.as_deref().unwrap_or_default(),
            dto.last_name.as_deref().unwrap_or_default(),
        )?;
        self.ensure_unique(&user).await?;

        let created = self.user_repo.create(&user).await?;

        info!(user_id = created.id(), username = created.username(), "User created");
        Ok(UserDto::from(created))
    }

    async fn update_user(&self, user_id: i32, update: UpdateUserDto) -> Result<UserDto, UserError> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound)?;

        if let Some(username) = update.username {
            user.set_username(&username)?;
        }
        if let Some(email) = update.email {
            user.set_email(&email)?;
        }
        if let Some(first_name) = update.first_name {
            user.set_first_name(&first_name)?;
        }
        if let Some(last_name) = update.last_name {
            user.set_last_name(&last_name)?;
        }
        match update.is_active {
            Some(true) => user.activate(),
            Some(false) => user.deactivate(),
            None => {}
        }
        self.ensure_unique(&user).await?;

        let updated = self.user_repo.update(&user).await?;

        info!(user_id, "User updated");
        Ok(UserDto::from(updated))
    }

    async fn delete_user(&self, user_id: i32) -> Result<(), UserError> {
        if !self.user_repo.delete(user_id).await? {
            return Err(UserError::NotFound);
        }

        info!(user_id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockUserRepository;
    use crate::infrastructure::repositories::InMemoryUserRepository;
    use pretty_assertions::assert_eq;

    fn service() -> UserServiceImpl<InMemoryUserRepository> {
        UserServiceImpl::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn alice() -> CreateUserDto {
        CreateUserDto {
            username: "Alice_01".into(),
            email: "Alice@Example.com".into(),
            first_name: Some("Alice".into()),
            last_name: Some("Liddell".into()),
        }
    }

    #[tokio::test]
    async fn test_create_user_normalizes_fields() {
        let service = service();

        let user = service.create_user(alice()).await.unwrap();

        assert_eq!(user.username, "alice_01");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.full_name, "Alice Liddell");
        assert!(user.is_active);
        assert_eq!(service.get_user_by_username("ALICE_01").await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_create_user_rejects_taken_username_and_email() {
        let service = service();
        service.create_user(alice()).await.unwrap();

        let same_name = service
            .create_user(CreateUserDto {
                email: "other@example.com".into(),
                ..alice()
            })
            .await;
        let same_email = service
            .create_user(CreateUserDto {
                username: "someone_else".into(),
                ..alice()
            })
            .await;

        assert!(matches!(same_name, Err(UserError::UsernameTaken)));
        assert!(matches!(same_email, Err(UserError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_create_user_rejects_bad_email() {
        let result = service()
            .create_user(CreateUserDto {
                email: "not-an-email".into(),
                ..alice()
            })
            .await;

        assert!(matches!(result, Err(UserError::Validation(msg)) if msg == "Invalid email format"));
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        let service = service();
        let user = service.create_user(alice()).await.unwrap();

        let updated = service
            .update_user(
                user.id,
                UpdateUserDto {
                    last_name: Some("Kingsleigh".into()),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username, "alice_01");
        assert_eq!(updated.full_name, "Alice Kingsleigh");
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let service = UserServiceImpl::new(Arc::new(repo));

        let result = service.update_user(7, UpdateUserDto::default()).await;

        assert!(matches!(result, Err(UserError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let service = service();
        let user = service.create_user(alice()).await.unwrap();

        service.delete_user(user.id).await.unwrap();

        assert!(matches!(service.get_user(user.id).await, Err(UserError::NotFound)));
        assert!(matches!(service.delete_user(user.id).await, Err(UserError::NotFound)));
    }
}
