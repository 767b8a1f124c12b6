//! In-memory Product Repository
//!
//! Process-local product storage for development and tests. Data lives as long
//! as the repository instance; the application shares one instance across all
//! requests.

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::domain::{Product, ProductRepository};
use crate::shared::error::AppError;

struct ProductStore {
    products: Vec<Product>,
    next_id: i32,
}

/// In-memory implementation of [`ProductRepository`].
///
/// Products are kept in insertion order, which is also id order since ids come
/// from a counter that only increases.
pub struct InMemoryProductRepository {
    store: RwLock<ProductStore>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(ProductStore {
                products: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn filter<F>(&self, predicate: F) -> Vec<Product>
    where
        F: Fn(&Product) -> bool,
    {
        self.store
            .read()
            .products
            .iter()
            .filter(|p| predicate(p))
            .cloned()
            .collect()
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.store.read().products.clone())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, AppError> {
        Ok(self
            .store
            .read()
            .products
            .iter()
            .find(|p| p.id() == id)
            .cloned())
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError> {
        Ok(self
            .store
            .read()
            .products
            .iter()
            .find(|p| p.sku() == sku)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, AppError> {
        let name = name.trim().to_lowercase();
        Ok(self.filter(|p| p.name().to_lowercase() == name))
    }

    async fn search(&self, term: &str) -> Result<Vec<Product>, AppError> {
        let term = term.trim().to_lowercase();
        Ok(self.filter(|p| {
            p.name().to_lowercase().contains(&term)
                || p.description().to_lowercase().contains(&term)
                || p.sku().to_lowercase().contains(&term)
        }))
    }

    async fn find_by_price_range(&self, min: Decimal, max: Decimal) -> Result<Vec<Product>, AppError> {
        Ok(self.filter(|p| p.price() >= min && p.price() <= max))
    }

    async fn find_by_category(&self, category_id: i32) -> Result<Vec<Product>, AppError> {
        Ok(self.filter(|p| p.category_id() == Some(category_id)))
    }

    async fn create(&self, product: &Product) -> Result<Product, AppError> {
        let mut store = self.store.write();

        if store.products.iter().any(|p| p.sku() == product.sku()) {
            return Err(AppError::Conflict(format!(
                "Product with SKU '{}' already exists",
                product.sku()
            )));
        }

        let mut stored = product.clone();
        stored.assign_id(store.next_id);
        store.next_id += 1;
        store.products.push(stored.clone());

        Ok(stored)
    }

    async fn update(&self, product: &Product) -> Result<Product, AppError> {
        let mut store = self.store.write();

        if store
            .products
            .iter()
            .any(|p| p.sku() == product.sku() && p.id() != product.id())
        {
            return Err(AppError::Conflict(format!(
                "Product with SKU '{}' already exists",
                product.sku()
            )));
        }

        let slot = store
            .products
            .iter_mut()
            .find(|p| p.id() == product.id())
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", product.id())))?;
        *slot = product.clone();

        Ok(product.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut store = self.store.write();
        let before = store.products.len();
        store.products.retain(|p| p.id() != id);
        Ok(store.products.len() != before)
    }

    async fn sku_exists(&self, sku: &str) -> Result<bool, AppError> {
        Ok(self.store.read().products.iter().any(|p| p.sku() == sku))
    }
}
