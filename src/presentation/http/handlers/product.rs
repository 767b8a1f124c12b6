//! Product Handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{
    CreateProductRequest, PriceRangeQueryParams, SearchQueryParams, UpdateProductRequest,
};
use crate::application::dto::response::ProductResponse;
use crate::application::services::{ProductDto, ProductError, ProductService, ProductServiceImpl};
use crate::infrastructure::metrics;
use crate::presentation::http::extractors::{JsonBody, QueryParams};
use crate::shared::error::AppError;
use crate::shared::validation::{parse_positive_id, validation_error};
use crate::startup::AppState;

const MAX_SEARCH_TERM_LENGTH: usize = 100;

fn product_service(state: &AppState) -> impl ProductService {
    ProductServiceImpl::new(state.products.clone(), state.categories.clone())
}

fn map_product_error(e: ProductError) -> AppError {
    match e {
        ProductError::NotFound(id) => AppError::NotFound(format!("Product with id {} not found", id)),
        ProductError::DuplicateSku(_) => AppError::Conflict(e.to_string()),
        ProductError::Validation(msg) => AppError::Validation(msg),
        ProductError::Internal(msg) => AppError::Internal(msg),
    }
}

fn to_responses(products: Vec<ProductDto>) -> Json<Vec<ProductResponse>> {
    Json(products.into_iter().map(ProductResponse::from).collect())
}

/// List all products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = product_service(&state)
        .get_all_products()
        .await
        .map_err(map_product_error)?;

    Ok(to_responses(products))
}

/// Get product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let product_id = parse_positive_id(&product_id, "Product")?;

    let product = product_service(&state)
        .get_product_by_id(product_id)
        .await
        .map_err(map_product_error)?
        .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", product_id)))?;

    Ok(Json(ProductResponse::from(product)))
}

/// Get product by SKU
pub async fn get_product_by_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = product_service(&state)
        .get_product_by_sku(&sku)
        .await
        .map_err(map_product_error)?
        .ok_or_else(|| AppError::NotFound(format!("Product with SKU '{}' not found", sku)))?;

    Ok(Json(ProductResponse::from(product)))
}

/// Get products by exact name
pub async fn get_products_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = product_service(&state)
        .get_products_by_name(&name)
        .await
        .map_err(map_product_error)?;

    Ok(to_responses(products))
}

/// Search products by name, description or SKU
pub async fn search_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SearchQueryParams>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let term = query.term.unwrap_or_default();
    let term = term.trim();
    if term.is_empty() {
        return Err(AppError::BadRequest("Search term is required".into()));
    }
    if term.chars().count() > MAX_SEARCH_TERM_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Search term cannot exceed {} characters",
            MAX_SEARCH_TERM_LENGTH
        )));
    }

    let products = product_service(&state)
        .search_products(term)
        .await
        .map_err(map_product_error)?;

    Ok(to_responses(products))
}

/// Get products within an inclusive price range
pub async fn get_products_by_price_range(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PriceRangeQueryParams>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let (Some(min_price), Some(max_price)) = (query.min_price, query.max_price) else {
        return Err(AppError::BadRequest(
            "Both minPrice and maxPrice are required".into(),
        ));
    };

    let products = product_service(&state)
        .get_products_by_price_range(min_price, max_price)
        .await
        .map_err(map_product_error)?;

    Ok(to_responses(products))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate().map_err(validation_error)?;

    let result = product_service(&state).create_product(body.into()).await;
    metrics::record_product_operation("create", result.is_ok());
    let product = result.map_err(map_product_error)?;

    let location = format!("/api/products/{}", product.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProductResponse::from(product)),
    ))
}

/// Replace a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    JsonBody(body): JsonBody<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let product_id = parse_positive_id(&product_id, "Product")?;
    body.validate().map_err(validation_error)?;

    let result = product_service(&state)
        .update_product(product_id, body.into())
        .await;
    metrics::record_product_operation("update", result.is_ok());
    let product = result.map_err(map_product_error)?;

    Ok(Json(ProductResponse::from(product)))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let product_id = parse_positive_id(&product_id, "Product")?;

    let deleted = product_service(&state)
        .delete_product(product_id)
        .await
        .map_err(map_product_error)?;
    metrics::record_product_operation("delete", deleted);

    if !deleted {
        return Err(AppError::NotFound(format!(
            "Product with id {} not found",
            product_id
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
