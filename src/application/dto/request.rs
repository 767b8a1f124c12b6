//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationError};

use crate::application::services::{
    CreateCategoryDto, CreateProductDto, CreateUserDto, UpdateProductDto, UpdateUserDto,
};
use crate::domain::MAX_PRICE;

/// Text fields are trimmed before validation so padding never counts
/// towards length limits.
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|value| value.trim().to_string())
}

fn trimmed_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|value| value.map(|value| value.trim().to_string()))
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::new("price").with_message("Price cannot be negative".into()));
    }
    if *price > MAX_PRICE {
        return Err(ValidationError::new("price")
            .with_message(format!("Price cannot exceed {}", MAX_PRICE).into()));
    }
    Ok(())
}

/// Create product request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 50, message = "SKU must be 1-50 characters"))]
    pub sku: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = validate_price))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity_in_stock: i32,

    #[validate(range(min = 1, message = "Category ID must be a positive integer"))]
    pub category_id: Option<i32>,
}

impl From<CreateProductRequest> for CreateProductDto {
    fn from(body: CreateProductRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            sku: body.sku,
            price: body.price,
            quantity_in_stock: body.quantity_in_stock,
            category_id: body.category_id,
        }
    }
}

/// Update product request (full replacement)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 50, message = "SKU must be 1-50 characters"))]
    pub sku: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = validate_price))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity_in_stock: i32,

    #[validate(range(min = 1, message = "Category ID must be a positive integer"))]
    pub category_id: Option<i32>,
}

impl From<UpdateProductRequest> for UpdateProductDto {
    fn from(body: UpdateProductRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            sku: body.sku,
            price: body.price,
            quantity_in_stock: body.quantity_in_stock,
            category_id: body.category_id,
        }
    }
}

/// Create category request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

impl From<CreateCategoryRequest> for CreateCategoryDto {
    fn from(body: CreateCategoryRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,
}

impl From<CreateUserRequest> for CreateUserDto {
    fn from(body: CreateUserRequest) -> Self {
        Self {
            username: body.username,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
        }
    }
}

/// Update user request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "trimmed_option")]
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,

    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUserDto {
    fn from(body: UpdateUserRequest) -> Self {
        Self {
            username: body.username,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            is_active: body.is_active,
        }
    }
}

/// Product search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQueryParams {
    pub term: Option<String>,
}

/// Price range query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeQueryParams {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// Top categories query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCategoriesQueryParams {
    pub count: Option<i64>,
    pub sort_by: Option<String>,
}

/// Category trends query parameters
#[derive(Debug, Deserialize)]
pub struct TrendsQueryParams {
    pub days: Option<i64>,
}
