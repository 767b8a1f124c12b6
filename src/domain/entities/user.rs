//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::shared::error::AppError;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_PERSON_NAME_LENGTH: usize = 100;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern is valid"));

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

/// Represents a user of the inventory system.
///
/// Maps to the `users` table:
/// - id: SERIAL PRIMARY KEY
/// - username: VARCHAR(50) NOT NULL UNIQUE
/// - email: VARCHAR(254) NOT NULL UNIQUE
/// - first_name: VARCHAR(100) NOT NULL DEFAULT ''
/// - last_name: VARCHAR(100) NOT NULL DEFAULT ''
/// - is_active: BOOLEAN NOT NULL DEFAULT TRUE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: i32,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, active, not yet persisted user.
    pub fn new(
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, AppError> {
        let now = Utc::now();
        Ok(Self {
            id: 0,
            username: normalize_username(username)?,
            email: normalize_email(email)?,
            first_name: normalize_person_name(first_name, "First name")?,
            last_name: normalize_person_name(last_name, "Last name")?,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a stored user, re-running every check.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: i32,
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let mut user = Self::new(username, email, first_name, last_name)?;
        user.id = id;
        user.is_active = is_active;
        user.created_at = created_at;
        user.updated_at = updated_at;
        Ok(user)
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn assign_id(&mut self, id: i32) {
        self.id = id;
    }

    /// Set the username; stored lowercased.
    pub fn set_username(&mut self, username: &str) -> Result<(), AppError> {
        self.username = normalize_username(username)?;
        self.touch();
        Ok(())
    }

    /// Set the email; stored lowercased.
    pub fn set_email(&mut self, email: &str) -> Result<(), AppError> {
        self.email = normalize_email(email)?;
        self.touch();
        Ok(())
    }

    pub fn set_first_name(&mut self, first_name: &str) -> Result<(), AppError> {
        self.first_name = normalize_person_name(first_name, "First name")?;
        self.touch();
        Ok(())
    }

    pub fn set_last_name(&mut self, last_name: &str) -> Result<(), AppError> {
        self.last_name = normalize_person_name(last_name, "Last name")?;
        self.touch();
        Ok(())
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    /// Re-run every field check and report the first violation.
    pub fn validate(&self) -> Result<(), AppError> {
        normalize_username(&self.username)?;
        normalize_email(&self.email)?;
        normalize_person_name(&self.first_name, "First name")?;
        normalize_person_name(&self.last_name, "Last name")?;
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn normalize_username(username: &str) -> Result<String, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    let length = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(AppError::validation(format!(
            "Username must be between {} and {} characters",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        )));
    }
    if !USERNAME_PATTERN.is_match(username) {
        return Err(AppError::validation(
            "Username can only contain letters, numbers, and underscores",
        ));
    }
    Ok(username.to_lowercase())
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::validation("Email is required"));
    }
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(AppError::validation(format!(
            "Email cannot exceed {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(AppError::validation("Invalid email format"));
    }
    Ok(email.to_lowercase())
}

fn normalize_person_name(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.chars().count() > MAX_PERSON_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "{} cannot exceed {} characters",
            field, MAX_PERSON_NAME_LENGTH
        )));
    }
    Ok(value.to_string())
}

/// Repository trait for User data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id.
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    /// Find a user by (lowercased) username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Find a user by (lowercased) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Persist a new user and return it with its assigned id.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Overwrite an existing user.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Remove a user. Returns `false` when nothing was deleted.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}
