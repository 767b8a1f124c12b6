//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **ProductService**: Product CRUD, lookup and search
//! - **CategoryService**: Category listing and creation
//! - **CategoryAnalyticsService**: Per-category inventory aggregates and trends
//! - **UserService**: User management

pub mod category_analytics_service;
pub mod category_service;
pub mod product_service;
pub mod user_service;

// Re-export product service types
pub use product_service::{
    CreateProductDto, ProductDto, ProductError, ProductService, ProductServiceImpl,
    UpdateProductDto,
};

// Re-export category service types
pub use category_service::{
    CategoryDto, CategoryError, CategoryService, CategoryServiceImpl, CreateCategoryDto,
};

// Re-export analytics service types
pub use category_analytics_service::{
    AnalyticsError, CategoryAnalyticsData, CategoryAnalyticsService, CategoryAnalyticsServiceImpl,
    CategoryRanking, CategoryTrendData, OverallCategoryMetrics, TopCategoriesSort, TrendDirection,
};

// Re-export user service types
pub use user_service::{CreateUserDto, UpdateUserDto, UserDto, UserError, UserService, UserServiceImpl};
