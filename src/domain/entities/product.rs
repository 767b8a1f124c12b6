//! Product entity and repository trait.
//!
//! Maps to the `products` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::shared::error::AppError;

/// Maximum length of a product name (after trimming).
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Maximum length of a SKU.
pub const MAX_SKU_LENGTH: usize = 50;

/// Highest accepted unit price: 999,999.99.
pub const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

static SKU_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9-]+$").expect("SKU pattern is valid"));

/// Represents a stocked product.
///
/// Maps to the `products` table:
/// - id: SERIAL PRIMARY KEY
/// - name: VARCHAR(200) NOT NULL
/// - description: VARCHAR(1000) NOT NULL DEFAULT ''
/// - sku: VARCHAR(50) NOT NULL UNIQUE
/// - price: NUMERIC(10, 2) NOT NULL
/// - quantity_in_stock: INTEGER NOT NULL
/// - category_id: INTEGER NULL REFERENCES categories(id)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// Fields are private: every assignment goes through a setter that normalises
/// the value and rejects it with [`AppError::Validation`] when it breaks a rule.
/// A rejected assignment leaves the product untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
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

impl Product {
    /// Create a new, not yet persisted product (id 0).
    pub fn new(
        name: &str,
        description: &str,
        sku: &str,
        price: Decimal,
        quantity_in_stock: i32,
    ) -> Result<Self, AppError> {
        let now = Utc::now();
        Ok(Self {
            id: 0,
            name: normalize_name(name)?,
            description: normalize_description(description)?,
            sku: normalize_sku(sku)?,
            price: check_price(price)?,
            quantity_in_stock: check_quantity(quantity_in_stock)?,
            category_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a stored product. Values pass through the same checks as `new`,
    /// so a corrupted row surfaces as a validation error instead of a bad entity.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: i32,
        name: &str,
        description: &str,
        sku: &str,
        price: Decimal,
        quantity_in_stock: i32,
        category_id: Option<i32>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let mut product = Self::new(name, description, sku, price, quantity_in_stock)?;
        product.id = id;
        product.category_id = check_category_id(category_id)?;
        product.created_at = created_at;
        product.updated_at = updated_at;
        Ok(product)
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

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn quantity_in_stock(&self) -> i32 {
        self.quantity_in_stock
    }

    pub fn category_id(&self) -> Option<i32> {
        self.category_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Assign the storage identifier. Only repositories call this.
    pub fn assign_id(&mut self, id: i32) {
        self.id = id;
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), AppError> {
        self.name = normalize_name(name)?;
        self.touch();
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), AppError> {
        self.description = normalize_description(description)?;
        self.touch();
        Ok(())
    }

    /// Set the SKU; stored trimmed and uppercased.
    pub fn set_sku(&mut self, sku: &str) -> Result<(), AppError> {
        self.sku = normalize_sku(sku)?;
        self.touch();
        Ok(())
    }

    pub fn set_price(&mut self, price: Decimal) -> Result<(), AppError> {
        self.price = check_price(price)?;
        self.touch();
        Ok(())
    }

    pub fn set_quantity_in_stock(&mut self, quantity: i32) -> Result<(), AppError> {
        self.quantity_in_stock = check_quantity(quantity)?;
        self.touch();
        Ok(())
    }

    pub fn set_category_id(&mut self, category_id: Option<i32>) -> Result<(), AppError> {
        self.category_id = check_category_id(category_id)?;
        self.touch();
        Ok(())
    }

    /// Re-run every field check and report the first violation.
    pub fn validate(&self) -> Result<(), AppError> {
        normalize_name(&self.name)?;
        normalize_description(&self.description)?;
        normalize_sku(&self.sku)?;
        check_price(self.price)?;
        check_quantity(self.quantity_in_stock)?;
        check_category_id(self.category_id)?;
        Ok(())
    }

    /// Price times quantity on hand.
    pub fn inventory_value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity_in_stock)
    }

    pub fn is_in_stock(&self) -> bool {
        self.quantity_in_stock > 0
    }

    /// In stock, but at or below `threshold` units.
    pub fn is_low_stock(&self, threshold: i32) -> bool {
        self.quantity_in_stock > 0 && self.quantity_in_stock <= threshold
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Normalize a SKU the way products store it (trimmed, uppercase).
pub fn canonical_sku(sku: &str) -> String {
    sku.trim().to_uppercase()
}

fn normalize_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Product name is required"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "Product name cannot exceed {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

fn normalize_description(description: &str) -> Result<String, AppError> {
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::validation(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(description.to_string())
}

fn normalize_sku(sku: &str) -> Result<String, AppError> {
    let sku = canonical_sku(sku);
    if sku.is_empty() {
        return Err(AppError::validation("SKU is required"));
    }
    if sku.chars().count() > MAX_SKU_LENGTH {
        return Err(AppError::validation(format!(
            "SKU cannot exceed {} characters",
            MAX_SKU_LENGTH
        )));
    }
    if !SKU_PATTERN.is_match(&sku) {
        return Err(AppError::validation(
            "SKU must contain only uppercase letters, numbers, and hyphens",
        ));
    }
    Ok(sku)
}

fn check_price(price: Decimal) -> Result<Decimal, AppError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::validation("Price cannot be negative"));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "Price cannot exceed {}",
            MAX_PRICE
        )));
    }
    Ok(price)
}

fn check_quantity(quantity: i32) -> Result<i32, AppError> {
    if quantity < 0 {
        return Err(AppError::validation("Quantity in stock cannot be negative"));
    }
    Ok(quantity)
}

fn check_category_id(category_id: Option<i32>) -> Result<Option<i32>, AppError> {
    match category_id {
        Some(id) if id <= 0 => Err(AppError::validation("Category ID must be a positive integer")),
        other => Ok(other),
    }
}

/// Repository trait for Product data access operations.
///
/// Implementations of this trait handle the actual storage interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, ordered by id.
    async fn find_all(&self) -> Result<Vec<Product>, AppError>;

    /// Find a product by its id.
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, AppError>;

    /// Find a product by its (already normalized) SKU.
    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, AppError>;

    /// Products whose name equals `name`, ignoring case.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, AppError>;

    /// Products whose name, description or SKU contains `term`, ignoring case.
    async fn search(&self, term: &str) -> Result<Vec<Product>, AppError>;

    /// Products priced within `[min, max]`.
    async fn find_by_price_range(&self, min: Decimal, max: Decimal) -> Result<Vec<Product>, AppError>;

    /// Products assigned to a category.
    async fn find_by_category(&self, category_id: i32) -> Result<Vec<Product>, AppError>;

    /// Persist a new product and return it with its assigned id.
    async fn create(&self, product: &Product) -> Result<Product, AppError>;

    /// Overwrite an existing product.
    async fn update(&self, product: &Product) -> Result<Product, AppError>;

    /// Remove a product. Returns `false` when nothing was deleted.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    /// Check whether a SKU is already taken.
    async fn sku_exists(&self, sku: &str) -> Result<bool, AppError>;
}
