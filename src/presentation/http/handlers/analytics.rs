//! Category Analytics Handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::application::dto::request::{TopCategoriesQueryParams, TrendsQueryParams};
use crate::application::services::{
    AnalyticsError, CategoryAnalyticsData, CategoryAnalyticsService, CategoryAnalyticsServiceImpl,
    CategoryTrendData, OverallCategoryMetrics,
};
use crate::presentation::http::extractors::QueryParams;
use crate::shared::error::AppError;
use crate::shared::validation::parse_positive_id;
use crate::startup::AppState;

const DEFAULT_TOP_COUNT: i64 = 5;
const MAX_TOP_COUNT: i64 = 50;
const MAX_TREND_DAYS: i64 = 365;

fn analytics_service(state: &AppState) -> impl CategoryAnalyticsService {
    CategoryAnalyticsServiceImpl::new(
        state.categories.clone(),
        state.products.clone(),
        state.settings.analytics.low_stock_threshold,
    )
}

fn map_analytics_error(e: AnalyticsError) -> AppError {
    match e {
        AnalyticsError::InvalidArgument(msg) => AppError::BadRequest(msg),
        AnalyticsError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Analytics for every category
pub async fn get_all_category_analytics(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryAnalyticsData>>, AppError> {
    let analytics = analytics_service(&state)
        .get_all_category_analytics()
        .await
        .map_err(map_analytics_error)?;

    Ok(Json(analytics))
}

/// Analytics for a single category
pub async fn get_category_analytics(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<CategoryAnalyticsData>, AppError> {
    let category_id = parse_positive_id(&category_id, "Category")?;

    let analytics = analytics_service(&state)
        .get_category_analytics(category_id)
        .await
        .map_err(map_analytics_error)?
        .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", category_id)))?;

    Ok(Json(analytics))
}

/// Catalogue-wide metrics
pub async fn get_overall_metrics(
    State(state): State<AppState>,
) -> Result<Json<OverallCategoryMetrics>, AppError> {
    let metrics = analytics_service(&state)
        .get_overall_metrics()
        .await
        .map_err(map_analytics_error)?;

    Ok(Json(metrics))
}

/// Highest ranked categories
pub async fn get_top_categories(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<TopCategoriesQueryParams>,
) -> Result<Json<Vec<CategoryAnalyticsData>>, AppError> {
    let count = query.count.unwrap_or(DEFAULT_TOP_COUNT);
    if !(1..=MAX_TOP_COUNT).contains(&count) {
        return Err(AppError::BadRequest(format!(
            "Count must be between 1 and {}",
            MAX_TOP_COUNT
        )));
    }
    let sort_by = query.sort_by.unwrap_or_else(|| "productCount".to_string());

    let top = analytics_service(&state)
        .get_top_categories(count as usize, &sort_by)
        .await
        .map_err(map_analytics_error)?;

    Ok(Json(top))
}

/// Recent-activity trends
pub async fn get_category_trends(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<TrendsQueryParams>,
) -> Result<Json<Vec<CategoryTrendData>>, AppError> {
    let days = query.days.unwrap_or(state.settings.analytics.default_trend_days);
    if !(1..=MAX_TREND_DAYS).contains(&days) {
        return Err(AppError::BadRequest(format!(
            "Days must be between 1 and {}",
            MAX_TREND_DAYS
        )));
    }

    let trends = analytics_service(&state)
        .get_category_trends(days)
        .await
        .map_err(map_analytics_error)?;

    Ok(Json(trends))
}
