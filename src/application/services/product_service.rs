//! Product Service
//!
//! CRUD and lookup operations over the product catalogue. Maps between the
//! `Product` entity and `ProductDto`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::domain::{canonical_sku, CategoryRepository, Product, ProductRepository};
use crate::shared::error::AppError;

/// Product service trait
#[async_trait]
pub trait ProductService: Send + Sync {
    /// List every product
    async fn get_all_products(&self) -> Result<Vec<ProductDto>, ProductError>;

    /// Get product by ID
    async fn get_product_by_id(&self, id: i32) -> Result<Option<ProductDto>, ProductError>;

    /// Get product by SKU (any case, surrounding whitespace ignored)
    async fn get_product_by_sku(&self, sku: &str) -> Result<Option<ProductDto>, ProductError>;

    /// Products whose name matches exactly, ignoring case
    async fn get_products_by_name(&self, name: &str) -> Result<Vec<ProductDto>, ProductError>;

    /// Products whose name, description or SKU contains the term
    async fn search_products(&self, term: &str) -> Result<Vec<ProductDto>, ProductError>;

    /// Products priced within an inclusive range
    async fn get_products_by_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<ProductDto>, ProductError>;

    /// Create a product
    async fn create_product(&self, dto: CreateProductDto) -> Result<ProductDto, ProductError>;

    /// Replace every settable field of an existing product
    async fn update_product(&self, id: i32, dto: UpdateProductDto) -> Result<ProductDto, ProductError>;

    /// Delete a product; `false` when it did not exist
    async fn delete_product(&self, id: i32) -> Result<bool, ProductError>;
}

/// Product data transfer object
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub price: Decimal,
    pub quantity_in_stock: i32,
    pub category_id: Option<i32>,
    pub inventory_value: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            sku: product.sku().to_string(),
            price: product.price(),
            quantity_in_stock: product.quantity_in_stock(),
            category_id: product.category_id(),
            inventory_value: product.inventory_value(),
            created_at: product.created_at(),
            updated_at: product.updated_at(),
        }
    }
}

/// Create product input
#[derive(Debug, Clone, Default)]
pub struct CreateProductDto {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub quantity_in_stock: i32,
    pub category_id: Option<i32>,
}

/// Update product input
#[derive(Debug, Clone, Default)]
pub struct UpdateProductDto {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub quantity_in_stock: i32,
    pub category_id: Option<i32>,
}

/// Product service errors
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Product with id {0} not found")]
    NotFound(i32),

    #[error("Product with SKU '{0}' already exists")]
    DuplicateSku(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProductError {
    fn from_repository(e: AppError, sku: &str) -> Self {
        match e {
            AppError::Conflict(_) => ProductError::DuplicateSku(sku.to_string()),
            AppError::Validation(msg) => ProductError::Validation(msg),
            e => ProductError::Internal(e.to_string()),
        }
    }
}

impl From<AppError> for ProductError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Validation(msg) => ProductError::Validation(msg),
            e => ProductError::Internal(e.to_string()),
        }
    }
}

/// ProductService implementation
pub struct ProductServiceImpl<P, C>
where
    P: ProductRepository + ?Sized,
    C: CategoryRepository + ?Sized,
{
    product_repo: Arc<P>,
    category_repo: Arc<C>,
}

impl<P, C> ProductServiceImpl<P, C>
where
    P: ProductRepository + ?Sized,
    C: CategoryRepository + ?Sized,
{
    pub fn new(product_repo: Arc<P>, category_repo: Arc<C>) -> Self {
        Self {
            product_repo,
            category_repo,
        }
    }

    async fn ensure_category_exists(&self, category_id: Option<i32>) -> Result<(), ProductError> {
        let Some(id) = category_id else {
            return Ok(());
        };
        if id <= 0 {
            return Err(ProductError::Validation(
                "Category ID must be a positive integer".to_string(),
            ));
        }
        if self.category_repo.find_by_id(id).await?.is_none() {
            return Err(ProductError::Validation(format!(
                "Category with id {} does not exist",
                id
            )));
        }
        Ok(())
    }

    fn into_dtos(products: Vec<Product>) -> Vec<ProductDto> {
        products.into_iter().map(ProductDto::from).collect()
    }
}

#[async_trait]
impl<P, C> ProductService for ProductServiceImpl<P, C>
where
    P: ProductRepository + ?Sized + 'static,
    C: CategoryRepository + ?Sized + 'static,
{
    async fn get_all_products(&self) -> Result<Vec<ProductDto>, ProductError> {
        let products = self.product_repo.find_all().await?;
        debug!(count = products.len(), "Fetched all products");
        Ok(Self::into_dtos(products))
    }

    async fn get_product_by_id(&self, id: i32) -> Result<Option<ProductDto>, ProductError> {
        let product = self.product_repo.find_by_id(id).await?;
        Ok(product.map(ProductDto::from))
    }

    async fn get_product_by_sku(&self, sku: &str) -> Result<Option<ProductDto>, ProductError> {
        let product = self.product_repo.find_by_sku(&canonical_sku(sku)).await?;
        Ok(product.map(ProductDto::from))
    }

    async fn get_products_by_name(&self, name: &str) -> Result<Vec<ProductDto>, ProductError> {
        let products = self.product_repo.find_by_name(name).await?;
        Ok(Self::into_dtos(products))
    }

    async fn search_products(&self, term: &str) -> Result<Vec<ProductDto>, ProductError> {
        let products = self.product_repo.search(term).await?;
        debug!(term, matches = products.len(), "Product search");
        Ok(Self::into_dtos(products))
    }

    async fn get_products_by_price_range(
        &self,
        min_price: Decimal,
        max_price: Decimal,
    ) -> Result<Vec<ProductDto>, ProductError> {
        if min_price.is_sign_negative() && !min_price.is_zero() {
            return Err(ProductError::Validation(
                "Minimum price cannot be negative".to_string(),
            ));
        }
        if min_price > max_price {
            return Err(ProductError::Validation(
                "Minimum price cannot be greater than maximum price".to_string(),
            ));
        }

        let products = self
            .product_repo
            .find_by_price_range(min_price, max_price)
            .await?;
        Ok(Self::into_dtos(products))
    }

    #[instrument(skip(self, dto), fields(sku = %dto.sku))]
    async fn create_product(&self, dto: CreateProductDto) -> Result<ProductDto, ProductError> {
        let mut product = Product::new(
            &dto.name,
            dto.description.as_deref().unwrap_or_default(),
            &dto.sku,
            dto.price,
            dto.quantity_in_stock,
        )?;
        product.set_category_id(dto.category_id)?;
        self.ensure_category_exists(product.category_id()).await?;

        if self.product_repo.sku_exists(product.sku()).await? {
            return Err(ProductError::DuplicateSku(product.sku().to_string()));
        }

        let created = self
            .product_repo
            .create(&product)
            .await
            .map_err(|e| ProductError::from_repository(e, product.sku()))?;

        info!(product_id = created.id(), sku = created.sku(), "Product created");
        Ok(ProductDto::from(created))
    }

    #[instrument(skip(self, dto))]
    async fn update_product(&self, id: i32, dto: UpdateProductDto) -> Result<ProductDto, ProductError> {
        let mut product = self
            .product_repo
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        product.set_name(&dto.name)?;
        product.set_description(dto.description.as_deref().unwrap_or_default())?;
        product.set_sku(&dto.sku)?;
        product.set_price(dto.price)?;
        product.set_quantity_in_stock(dto.quantity_in_stock)?;
        product.set_category_id(dto.category_id)?;
        self.ensure_category_exists(product.category_id()).await?;

        if let Some(owner) = self.product_repo.find_by_sku(product.sku()).await? {
            if owner.id() != id {
                return Err(ProductError::DuplicateSku(product.sku().to_string()));
            }
        }

        let updated = self
            .product_repo
            .update(&product)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => ProductError::NotFound(id),
                e => ProductError::from_repository(e, product.sku()),
            })?;

        info!(product_id = id, "Product updated");
        Ok(ProductDto::from(updated))
    }

    async fn delete_product(&self, id: i32) -> Result<bool, ProductError> {
        let deleted = self.product_repo.delete(id).await?;
        if deleted {
            info!(product_id = id, "Product deleted");
        } else {
            debug!(product_id = id, "Delete requested for missing product");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, MockCategoryRepository, MockProductRepository};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn stored_product(id: i32, sku: &str) -> Product {
        let mut product = Product::new("Widget", "", sku, Decimal::new(1999, 2), 5).unwrap();
        product.assign_id(id);
        product
    }

    fn service(
        products: MockProductRepository,
        categories: MockCategoryRepository,
    ) -> ProductServiceImpl<MockProductRepository, MockCategoryRepository> {
        ProductServiceImpl::new(Arc::new(products), Arc::new(categories))
    }

    fn create_dto(sku: &str) -> CreateProductDto {
        CreateProductDto {
            name: "Test".to_string(),
            description: None,
            sku: sku.to_string(),
            price: Decimal::new(2999, 2),
            quantity_in_stock: 100,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_product_normalizes_sku() {
        let mut products = MockProductRepository::new();
        products
            .expect_sku_exists()
            .with(eq("TEST-001"))
            .returning(|_| Ok(false));
        products.expect_create().returning(|p| {
            let mut stored = p.clone();
            stored.assign_id(1);
            Ok(stored)
        });

        let dto = service(products, MockCategoryRepository::new())
            .create_product(create_dto("test-001"))
            .await
            .unwrap();

        assert_eq!(dto.sku, "TEST-001");
        assert_eq!(dto.id, 1);
        assert_eq!(dto.price, Decimal::new(2999, 2));
        assert_eq!(dto.quantity_in_stock, 100);
        assert_eq!(dto.inventory_value, Decimal::new(299900, 2));
    }

    #[tokio::test]
    async fn test_create_product_rejects_invalid_price_before_storage() {
        let products = MockProductRepository::new();
        let mut dto = create_dto("TEST-001");
        dto.price = Decimal::new(-1, 0);

        let result = service(products, MockCategoryRepository::new())
            .create_product(dto)
            .await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_product_duplicate_sku() {
        let mut products = MockProductRepository::new();
        products.expect_sku_exists().returning(|_| Ok(true));

        let result = service(products, MockCategoryRepository::new())
            .create_product(create_dto("dup-1"))
            .await;

        assert!(matches!(result, Err(ProductError::DuplicateSku(sku)) if sku == "DUP-1"));
    }

    #[tokio::test]
    async fn test_create_product_with_unknown_category() {
        let mut categories = MockCategoryRepository::new();
        categories
            .expect_find_by_id()
            .with(eq(9))
            .returning(|_| Ok(None));
        let mut dto = create_dto("CAT-1");
        dto.category_id = Some(9);

        let result = service(MockProductRepository::new(), categories)
            .create_product(dto)
            .await;

        assert!(matches!(result, Err(ProductError::Validation(msg)) if msg.contains("does not exist")));
    }

    #[tokio::test]
    async fn test_create_product_with_known_category() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|id| {
            let mut category = Category::new("Tools", "").unwrap();
            category.assign_id(id);
            Ok(Some(category))
        });
        let mut products = MockProductRepository::new();
        products.expect_sku_exists().returning(|_| Ok(false));
        products.expect_create().returning(|p| Ok(p.clone()));
        let mut dto = create_dto("CAT-1");
        dto.category_id = Some(2);

        let created = service(products, categories).create_product(dto).await.unwrap();
        assert_eq!(created.category_id, Some(2));
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let result = service(products, MockCategoryRepository::new())
            .update_product(
                42,
                UpdateProductDto {
                    name: "X".into(),
                    sku: "X-1".into(),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ProductError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_update_product_rejects_sku_owned_by_other_product() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_product(id, "OWN-1"))));
        products
            .expect_find_by_sku()
            .with(eq("TAKEN-1"))
            .returning(|sku| Ok(Some(stored_product(2, sku))));

        let result = service(products, MockCategoryRepository::new())
            .update_product(
                1,
                UpdateProductDto {
                    name: "Widget".into(),
                    sku: "taken-1".into(),
                    price: Decimal::ONE,
                    quantity_in_stock: 1,
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ProductError::DuplicateSku(_))));
    }

    #[tokio::test]
    async fn test_update_product_applies_all_fields() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_product(id, "OWN-1"))));
        products
            .expect_find_by_sku()
            .returning(|sku| Ok(Some(stored_product(1, sku))));
        products.expect_update().returning(|p| Ok(p.clone()));

        let updated = service(products, MockCategoryRepository::new())
            .update_product(
                1,
                UpdateProductDto {
                    name: "  Renamed ".into(),
                    description: Some("New".into()),
                    sku: "own-1".into(),
                    price: Decimal::new(500, 2),
                    quantity_in_stock: 7,
                    category_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.description, "New");
        assert_eq!(updated.price, Decimal::new(500, 2));
        assert_eq!(updated.quantity_in_stock, 7);
    }

    #[tokio::test]
    async fn test_get_product_by_sku_normalizes_lookup() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_sku()
            .with(eq("ABC-1"))
            .returning(|sku| Ok(Some(stored_product(3, sku))));

        let found = service(products, MockCategoryRepository::new())
            .get_product_by_sku("  abc-1 ")
            .await
            .unwrap();

        assert_eq!(found.map(|p| p.id), Some(3));
    }

    #[tokio::test]
    async fn test_price_range_rejects_inverted_bounds() {
        let result = service(MockProductRepository::new(), MockCategoryRepository::new())
            .get_products_by_price_range(Decimal::from(10), Decimal::from(5))
            .await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_reports_missing_product() {
        let mut products = MockProductRepository::new();
        products.expect_delete().with(eq(5)).returning(|_| Ok(false));

        let deleted = service(products, MockCategoryRepository::new())
            .delete_product(5)
            .await
            .unwrap();

        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_repository_failure_is_internal() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_all()
            .returning(|| Err(AppError::Internal("boom".into())));

        let result = service(products, MockCategoryRepository::new())
            .get_all_products()
            .await;

        assert!(matches!(result, Err(ProductError::Internal(_))));
    }
}
