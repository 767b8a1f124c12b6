//! Category entity and repository trait.
//!
//! Maps to the `categories` table. Products reference a category through
//! `products.category_id`; analytics group on that column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::shared::error::AppError;

pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;
pub const MAX_CATEGORY_DESCRIPTION_LENGTH: usize = 500;

/// A product category.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    id: i32,
    name: String,
    description: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: &str, description: &str) -> Result<Self, AppError> {
        let now = Utc::now();
        Ok(Self {
            id: 0,
            name: normalize_name(name)?,
            description: normalize_description(description)?,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn restore(
        id: i32,
        name: &str,
        description: &str,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let mut category = Self::new(name, description)?;
        category.id = id;
        category.is_active = is_active;
        category.created_at = created_at;
        category.updated_at = updated_at;
        Ok(category)
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
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

    pub fn assign_id(&mut self, id: i32) {
        self.id = id;
    }
}

fn normalize_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name is required"));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Category name cannot exceed {} characters",
            MAX_CATEGORY_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

fn normalize_description(description: &str) -> Result<String, AppError> {
    let description = description.trim();
    if description.chars().count() > MAX_CATEGORY_DESCRIPTION_LENGTH {
        return Err(AppError::validation(format!(
            "Category description cannot exceed {} characters",
            MAX_CATEGORY_DESCRIPTION_LENGTH
        )));
    }
    Ok(description.to_string())
}

/// Repository trait for Category data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories, ordered by id.
    async fn find_all(&self) -> Result<Vec<Category>, AppError>;

    /// Find a category by id.
    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, AppError>;

    /// Persist a new category and return it with its assigned id.
    async fn create(&self, category: &Category) -> Result<Category, AppError>;
}
