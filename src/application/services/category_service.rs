//! Category Service
//!
//! Minimal category management; products are grouped by category for analytics.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{Category, CategoryRepository};
use crate::shared::error::AppError;

/// Category service trait
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// List every category, ordered by id
    async fn list_categories(&self) -> Result<Vec<CategoryDto>, CategoryError>;

    /// Get category by ID
    async fn get_category(&self, id: i32) -> Result<Option<CategoryDto>, CategoryError>;

    /// Create a category
    async fn create_category(&self, dto: CreateCategoryDto) -> Result<CategoryDto, CategoryError>;
}

/// Category data transfer object
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id(),
            name: category.name().to_string(),
            description: category.description().to_string(),
            is_active: category.is_active(),
            created_at: category.created_at(),
            updated_at: category.updated_at(),
        }
    }
}

/// Create category input
#[derive(Debug, Clone, Default)]
pub struct CreateCategoryDto {
    pub name: String,
    pub description: Option<String>,
}

/// Category service errors
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Category '{0}' already exists")]
    DuplicateName(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for CategoryError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Validation(msg) => CategoryError::Validation(msg),
            e => CategoryError::Internal(e.to_string()),
        }
    }
}

/// CategoryService implementation
pub struct CategoryServiceImpl<C>
where
    C: CategoryRepository + ?Sized,
{
    category_repo: Arc<C>,
}

impl<C> CategoryServiceImpl<C>
where
    C: CategoryRepository + ?Sized,
{
    pub fn new(category_repo: Arc<C>) -> Self {
        Self { category_repo }
    }
}

#[async_trait]
impl<C> CategoryService for CategoryServiceImpl<C>
where
    C: CategoryRepository + ?Sized + 'static,
{
    async fn list_categories(&self) -> Result<Vec<CategoryDto>, CategoryError> {
        let mut categories = self.category_repo.find_all().await?;
        categories.sort_by_key(Category::id);
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    async fn get_category(&self, id: i32) -> Result<Option<CategoryDto>, CategoryError> {
        let category = self.category_repo.find_by_id(id).await?;
        Ok(category.map(CategoryDto::from))
    }

    async fn create_category(&self, dto: CreateCategoryDto) -> Result<CategoryDto, CategoryError> {
        let category = Category::new(&dto.name, dto.description.as_deref().unwrap_or_default())?;

        let created = self
            .category_repo
            .create(&category)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => CategoryError::DuplicateName(category.name().to_string()),
                e => CategoryError::from(e),
            })?;

        info!(category_id = created.id(), name = created.name(), "Category created");
        Ok(CategoryDto::from(created))
    }
}
