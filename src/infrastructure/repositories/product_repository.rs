//! Product Repository Implementation
//!
//! PostgreSQL implementation of the ProductRepository trait.
//! Maps between the database schema and domain Product entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::like_pattern;
use crate::domain::{Product, ProductRepository};
use crate::shared::error::AppError;

const PRODUCT_COLUMNS: &str =
    "id, name, description, sku, price, quantity_in_stock, category_id, created_at, updated_at";

/// Database row representation matching the products table schema.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    sku: String,
    price: Decimal,
    quantity_in_stock: i32,
    category_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    /// Convert database row to domain Product entity.
    fn into_product(self) -> Result<Product, AppError> {
        Product::restore(
            self.id,
            &self.name,
            &self.description,
            &self.sku,
            self.price,
            self.quantity_in_stock,
            self.category_id,
            self.created_at,
            self.updated_at,
        )
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, AppError> {
    rows.into_iter().map(ProductRow::into_product).collect()
}

fn map_write_error(e: sqlx::Error, sku: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("Product with SKU '{}' already exists", sku))
        }
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::Validation("Category does not exist".to_string())
        }
        _ => AppError::Database(e),
    }
}

/// PostgreSQL product repository implementation.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new PgProductRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        into_products(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE sku = $1",
            PRODUCT_COLUMNS
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE LOWER(name) = LOWER($1) ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .bind(name.trim())
        .fetch_all(&self.pool)
        .await?;

        into_products(rows)
    }

    async fn search(&self, term: &str) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {}
            FROM products
            WHERE name ILIKE $1 OR description ILIKE $1 OR sku ILIKE $1
            ORDER BY id
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(like_pattern(term.trim()))
        .fetch_all(&self.pool)
        .await?;

        into_products(rows)
    }

    async fn find_by_price_range(&self, min: Decimal, max: Decimal) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE price BETWEEN $1 AND $2 ORDER BY price, id",
            PRODUCT_COLUMNS
        ))
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;

        into_products(rows)
    }

    async fn find_by_category(&self, category_id: i32) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE category_id = $1 ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        into_products(rows)
    }

    async fn create(&self, product: &Product) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (name, description, sku, price, quantity_in_stock, category_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(product.name())
        .bind(product.description())
        .bind(product.sku())
        .bind(product.price())
        .bind(product.quantity_in_stock())
        .bind(product.category_id())
        .bind(product.created_at())
        .bind(product.updated_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, product.sku()))?;

        row.into_product()
    }

    async fn update(&self, product: &Product) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = $2,
                description = $3,
                sku = $4,
                price = $5,
                quantity_in_stock = $6,
                category_id = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(product.id())
        .bind(product.name())
        .bind(product.description())
        .bind(product.sku())
        .bind(product.price())
        .bind(product.quantity_in_stock())
        .bind(product.category_id())
        .bind(product.updated_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, product.sku()))?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", product.id())))?;

        row.into_product()
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn sku_exists(&self, sku: &str) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1)",
        )
        .bind(sku)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }
}
