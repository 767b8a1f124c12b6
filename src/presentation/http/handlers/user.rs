//! User Handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateUserRequest, UpdateUserRequest};
use crate::application::dto::response::UserResponse;
use crate::application::services::{UserError, UserService, UserServiceImpl};
use crate::presentation::http::extractors::JsonBody;
use crate::shared::error::AppError;
use crate::shared::validation::{parse_positive_id, validation_error};
use crate::startup::AppState;

fn map_user_error(e: UserError) -> AppError {
    match e {
        UserError::NotFound => AppError::NotFound("User not found".into()),
        UserError::UsernameTaken | UserError::EmailTaken => AppError::Conflict(e.to_string()),
        UserError::Validation(msg) => AppError::Validation(msg),
        UserError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Register a user
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate().map_err(validation_error)?;

    let user = UserServiceImpl::new(state.users.clone())
        .create_user(body.into())
        .await
        .map_err(map_user_error)?;

    let location = format!("/api/users/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from(user)),
    ))
}

/// Get user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user_id = parse_positive_id(&user_id, "User")?;

    let user = UserServiceImpl::new(state.users.clone())
        .get_user(user_id)
        .await
        .map_err(map_user_error)?;

    Ok(Json(UserResponse::from(user)))
}

/// Get user by username
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserServiceImpl::new(state.users.clone())
        .get_user_by_username(&username)
        .await
        .map_err(map_user_error)?;

    Ok(Json(UserResponse::from(user)))
}

/// Update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(body): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user_id = parse_positive_id(&user_id, "User")?;
    body.validate().map_err(validation_error)?;

    let user = UserServiceImpl::new(state.users.clone())
        .update_user(user_id, body.into())
        .await
        .map_err(map_user_error)?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let user_id = parse_positive_id(&user_id, "User")?;

    UserServiceImpl::new(state.users.clone())
        .delete_user(user_id)
        .await
        .map_err(map_user_error)?;

    Ok(StatusCode::NO_CONTENT)
}
