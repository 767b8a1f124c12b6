//! In-memory Category Repository

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{Category, CategoryRepository};
use crate::shared::error::AppError;

struct CategoryStore {
    categories: Vec<Category>,
    next_id: i32,
}

/// In-memory implementation of [`CategoryRepository`].
pub struct InMemoryCategoryRepository {
    store: RwLock<CategoryStore>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(CategoryStore {
                categories: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.store.read().categories.clone())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, AppError> {
        Ok(self
            .store
            .read()
            .categories
            .iter()
            .find(|c| c.id() == id)
            .cloned())
    }

    async fn create(&self, category: &Category) -> Result<Category, AppError> {
        let mut store = self.store.write();

        if store
            .categories
            .iter()
            .any(|c| c.name().eq_ignore_ascii_case(category.name()))
        {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                category.name()
            )));
        }

        let mut stored = category.clone();
        stored.assign_id(store.next_id);
        store.next_id += 1;
        store.categories.push(stored.clone());

        Ok(stored)
    }
}
