//! Category Analytics Service
//!
//! Per-category inventory aggregates computed from the current product and
//! category sets. Nothing is cached: every call fetches and recomputes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{Category, CategoryRepository, Product, ProductRepository};
use crate::shared::error::AppError;
use crate::shared::numeric::{average, percentage};

/// Trend score at or above which a category counts as growing.
pub const GROWING_TREND_SCORE: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

/// Category analytics service trait
#[async_trait]
pub trait CategoryAnalyticsService: Send + Sync {
    /// Analytics for a single category, `None` if the category does not exist
    async fn get_category_analytics(
        &self,
        category_id: i32,
    ) -> Result<Option<CategoryAnalyticsData>, AnalyticsError>;

    /// Analytics for every category, ordered by category id
    async fn get_all_category_analytics(&self) -> Result<Vec<CategoryAnalyticsData>, AnalyticsError>;

    /// Totals across all categories
    async fn get_overall_metrics(&self) -> Result<OverallCategoryMetrics, AnalyticsError>;

    /// The `count` highest ranked categories by the given sort key.
    /// Unrecognised keys fall back to product count.
    async fn get_top_categories(
        &self,
        count: usize,
        sort_by: &str,
    ) -> Result<Vec<CategoryAnalyticsData>, AnalyticsError>;

    /// Share of each category's products created in the last `days` days
    async fn get_category_trends(&self, days: i64) -> Result<Vec<CategoryTrendData>, AnalyticsError>;
}

/// Aggregates for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalyticsData {
    pub category_id: i32,
    pub category_name: String,
    pub product_count: usize,
    pub total_quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_inventory_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub min_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub max_price: Option<Decimal>,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage_of_total_products: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage_of_total_value: Decimal,
    pub generated_at: DateTime<Utc>,
}

/// A category singled out in the overall metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRanking {
    pub category_id: i32,
    pub category_name: String,
    pub product_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub inventory_value: Decimal,
}

/// Totals across the whole catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallCategoryMetrics {
    pub total_categories: usize,
    pub categories_with_products: usize,
    pub total_products: usize,
    pub uncategorized_products: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_inventory_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_products_per_category: Decimal,
    pub largest_category: Option<CategoryRanking>,
    pub most_valuable_category: Option<CategoryRanking>,
    pub low_stock_products: usize,
    pub out_of_stock_products: usize,
    pub generated_at: DateTime<Utc>,
}

/// Recent-activity view of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrendData {
    pub category_id: i32,
    pub category_name: String,
    pub total_products: usize,
    pub recent_products: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub trend_score: Decimal,
    pub trend: TrendDirection,
    pub period_days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Growing,
    Stable,
    Inactive,
}

impl TrendDirection {
    fn from_score(score: Decimal) -> Self {
        if score >= GROWING_TREND_SCORE {
            Self::Growing
        } else if score > Decimal::ZERO {
            Self::Stable
        } else {
            Self::Inactive
        }
    }
}

/// Ranking key for [`CategoryAnalyticsService::get_top_categories`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopCategoriesSort {
    ProductCount,
    InventoryValue,
}

impl TopCategoriesSort {
    /// Parse a sort key, ignoring case, `_` and `-`.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "productcount" | "count" | "products" => Some(Self::ProductCount),
            "inventoryvalue" | "value" => Some(Self::InventoryValue),
            _ => None,
        }
    }
}

/// Analytics service errors
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for AnalyticsError {
    fn from(e: AppError) -> Self {
        AnalyticsError::Internal(e.to_string())
    }
}

/// Catalogue-wide totals used as the denominator for percentages.
struct CatalogueTotals {
    product_count: usize,
    inventory_value: Decimal,
}

impl CatalogueTotals {
    fn of(products: &[Product]) -> Self {
        Self {
            product_count: products.len(),
            inventory_value: products.iter().map(Product::inventory_value).sum(),
        }
    }
}

/// CategoryAnalyticsService implementation
pub struct CategoryAnalyticsServiceImpl<C, P>
where
    C: CategoryRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    category_repo: Arc<C>,
    product_repo: Arc<P>,
    low_stock_threshold: i32,
}

impl<C, P> CategoryAnalyticsServiceImpl<C, P>
where
    C: CategoryRepository + ?Sized,
    P: ProductRepository + ?Sized,
{
    pub fn new(category_repo: Arc<C>, product_repo: Arc<P>, low_stock_threshold: i32) -> Self {
        Self {
            category_repo,
            product_repo,
            low_stock_threshold,
        }
    }

    /// Aggregate one category's products.
    fn analyze(
        &self,
        category: &Category,
        products: &[&Product],
        totals: &CatalogueTotals,
        now: DateTime<Utc>,
    ) -> CategoryAnalyticsData {
        let product_count = products.len();
        let total_quantity: i64 = products
            .iter()
            .map(|p| i64::from(p.quantity_in_stock()))
            .sum();
        let total_inventory_value: Decimal = products.iter().map(|p| p.inventory_value()).sum();
        let price_sum: Decimal = products.iter().map(|p| p.price()).sum();

        CategoryAnalyticsData {
            category_id: category.id(),
            category_name: category.name().to_string(),
            product_count,
            total_quantity,
            total_inventory_value,
            average_price: average(price_sum, product_count),
            min_price: products.iter().map(|p| p.price()).min(),
            max_price: products.iter().map(|p| p.price()).max(),
            low_stock_count: products
                .iter()
                .filter(|p| p.is_low_stock(self.low_stock_threshold))
                .count(),
            out_of_stock_count: products.iter().filter(|p| !p.is_in_stock()).count(),
            percentage_of_total_products: percentage(
                Decimal::from(product_count),
                Decimal::from(totals.product_count),
            ),
            percentage_of_total_value: percentage(total_inventory_value, totals.inventory_value),
            generated_at: now,
        }
    }

    /// Fetch everything and compute analytics for every category, by id.
    async fn compute_all(&self) -> Result<Vec<CategoryAnalyticsData>, AnalyticsError> {
        let categories = self.category_repo.find_all().await?;
        let products = self.product_repo.find_all().await?;
        let totals = CatalogueTotals::of(&products);
        let by_category = group_by_category(&products);
        let now = Utc::now();

        let mut analytics: Vec<CategoryAnalyticsData> = categories
            .iter()
            .map(|category| {
                let members = by_category
                    .get(&category.id())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                self.analyze(category, members, &totals, now)
            })
            .collect();
        analytics.sort_by_key(|a| a.category_id);

        Ok(analytics)
    }
}

fn group_by_category(products: &[Product]) -> HashMap<i32, Vec<&Product>> {
    let mut groups: HashMap<i32, Vec<&Product>> = HashMap::new();
    for product in products {
        if let Some(category_id) = product.category_id() {
            groups.entry(category_id).or_default().push(product);
        }
    }
    groups
}

fn ranking(data: &CategoryAnalyticsData) -> CategoryRanking {
    CategoryRanking {
        category_id: data.category_id,
        category_name: data.category_name.clone(),
        product_count: data.product_count,
        inventory_value: data.total_inventory_value,
    }
}

/// Sort descending by the chosen key; ties go to the lower category id.
fn sort_by_key(analytics: &mut [CategoryAnalyticsData], sort: TopCategoriesSort) {
    match sort {
        TopCategoriesSort::ProductCount => analytics.sort_by(|a, b| {
            b.product_count
                .cmp(&a.product_count)
                .then(a.category_id.cmp(&b.category_id))
        }),
        TopCategoriesSort::InventoryValue => analytics.sort_by(|a, b| {
            b.total_inventory_value
                .cmp(&a.total_inventory_value)
                .then(a.category_id.cmp(&b.category_id))
        }),
    }
}

#[async_trait]
impl<C, P> CategoryAnalyticsService for CategoryAnalyticsServiceImpl<C, P>
where
    C: CategoryRepository + ?Sized + 'static,
    P: ProductRepository + ?Sized + 'static,
{
    async fn get_category_analytics(
        &self,
        category_id: i32,
    ) -> Result<Option<CategoryAnalyticsData>, AnalyticsError> {
        let Some(category) = self.category_repo.find_by_id(category_id).await? else {
            debug!(category_id, "Analytics requested for missing category");
            return Ok(None);
        };

        let totals = CatalogueTotals::of(&self.product_repo.find_all().await?);
        let products = self.product_repo.find_by_category(category_id).await?;
        let members: Vec<&Product> = products.iter().collect();

        Ok(Some(self.analyze(&category, &members, &totals, Utc::now())))
    }

    async fn get_all_category_analytics(&self) -> Result<Vec<CategoryAnalyticsData>, AnalyticsError> {
        self.compute_all().await
    }

    async fn get_overall_metrics(&self) -> Result<OverallCategoryMetrics, AnalyticsError> {
        let categories = self.category_repo.find_all().await?;
        let products = self.product_repo.find_all().await?;
        let totals = CatalogueTotals::of(&products);
        let by_category = group_by_category(&products);
        let now = Utc::now();

        let analytics: Vec<CategoryAnalyticsData> = categories
            .iter()
            .map(|category| {
                let members = by_category
                    .get(&category.id())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                self.analyze(category, members, &totals, now)
            })
            .collect();

        let categorized: usize = analytics.iter().map(|a| a.product_count).sum();
        let populated: Vec<&CategoryAnalyticsData> =
            analytics.iter().filter(|a| a.product_count > 0).collect();

        let largest_category = populated
            .iter()
            .copied()
            .min_by(|a, b| {
                b.product_count
                    .cmp(&a.product_count)
                    .then(a.category_id.cmp(&b.category_id))
            })
            .map(ranking);
        let most_valuable_category = populated
            .iter()
            .copied()
            .min_by(|a, b| {
                b.total_inventory_value
                    .cmp(&a.total_inventory_value)
                    .then(a.category_id.cmp(&b.category_id))
            })
            .map(ranking);

        Ok(OverallCategoryMetrics {
            total_categories: categories.len(),
            categories_with_products: populated.len(),
            total_products: totals.product_count,
            uncategorized_products: totals.product_count - categorized,
            total_inventory_value: totals.inventory_value,
            average_products_per_category: average(Decimal::from(categorized), categories.len()),
            largest_category,
            most_valuable_category,
            low_stock_products: products
                .iter()
                .filter(|p| p.is_low_stock(self.low_stock_threshold))
                .count(),
            out_of_stock_products: products.iter().filter(|p| !p.is_in_stock()).count(),
            generated_at: now,
        })
    }

    async fn get_top_categories(
        &self,
        count: usize,
        sort_by: &str,
    ) -> Result<Vec<CategoryAnalyticsData>, AnalyticsError> {
        if count == 0 {
            return Err(AnalyticsError::InvalidArgument(
                "Count must be greater than zero".to_string(),
            ));
        }

        let sort = TopCategoriesSort::parse(sort_by).unwrap_or_else(|| {
            warn!(
                sort_by,
                "Unrecognized sort key for top categories, falling back to product count"
            );
            TopCategoriesSort::ProductCount
        });

        let mut analytics = self.compute_all().await?;
        sort_by_key(&mut analytics, sort);
        analytics.truncate(count);

        Ok(analytics)
    }

    async fn get_category_trends(&self, days: i64) -> Result<Vec<CategoryTrendData>, AnalyticsError> {
        if days <= 0 {
            return Err(AnalyticsError::InvalidArgument(
                "Days must be greater than zero".to_string(),
            ));
        }

        let cutoff = Duration::try_days(days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| {
                AnalyticsError::InvalidArgument(format!("Days value {} is out of range", days))
            })?;

        let categories = self.category_repo.find_all().await?;
        let products = self.product_repo.find_all().await?;
        let by_category = group_by_category(&products);

        let mut trends: Vec<CategoryTrendData> = categories
            .iter()
            .map(|category| {
                let members = by_category
                    .get(&category.id())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let recent = members.iter().filter(|p| p.created_at() >= cutoff).count();
                let score = percentage(Decimal::from(recent), Decimal::from(members.len()));

                CategoryTrendData {
                    category_id: category.id(),
                    category_name: category.name().to_string(),
                    total_products: members.len(),
                    recent_products: recent,
                    trend_score: score,
                    trend: TrendDirection::from_score(score),
                    period_days: days,
                }
            })
            .collect();

        trends.sort_by(|a, b| {
            b.trend_score
                .cmp(&a.trend_score)
                .then(a.category_id.cmp(&b.category_id))
        });

        Ok(trends)
    }
}
