//! Category Handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::application::dto::request::CreateCategoryRequest;
use crate::application::dto::response::CategoryResponse;
use crate::application::services::{CategoryError, CategoryService, CategoryServiceImpl};
use crate::presentation::http::extractors::JsonBody;
use crate::shared::error::AppError;
use crate::shared::validation::{parse_positive_id, validation_error};
use crate::startup::AppState;

fn map_category_error(e: CategoryError) -> AppError {
    match e {
        CategoryError::DuplicateName(_) => AppError::Conflict(e.to_string()),
        CategoryError::Validation(msg) => AppError::Validation(msg),
        CategoryError::Internal(msg) => AppError::Internal(msg),
    }
}

/// List all categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = CategoryServiceImpl::new(state.categories.clone())
        .list_categories()
        .await
        .map_err(map_category_error)?;

    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

/// Get category by ID
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category_id = parse_positive_id(&category_id, "Category")?;

    let category = CategoryServiceImpl::new(state.categories.clone())
        .get_category(category_id)
        .await
        .map_err(map_category_error)?
        .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", category_id)))?;

    Ok(Json(CategoryResponse::from(category)))
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate().map_err(validation_error)?;

    let category = CategoryServiceImpl::new(state.categories.clone())
        .create_category(body.into())
        .await
        .map_err(map_category_error)?;

    let location = format!("/api/categories/{}", category.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CategoryResponse::from(category)),
    ))
}
