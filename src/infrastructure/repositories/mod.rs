//! Repository Implementations
//!
//! Concrete implementations of the repository traits defined in the domain
//! layer. Two storage backends are available:
//!
//! - **in_memory** - Vec-backed repositories for development and tests
//! - **PostgreSQL** - sqlx-backed repositories (`Pg*Repository`)
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use crate::infrastructure::repositories::{PgProductRepository, InMemoryProductRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let durable = PgProductRepository::new(pool.clone());
//!     let scratch = InMemoryProductRepository::new();
//! }
//! ```

pub mod in_memory;

pub mod category_repository;
pub mod product_repository;
pub mod user_repository;

pub use category_repository::PgCategoryRepository;
pub use in_memory::{InMemoryCategoryRepository, InMemoryProductRepository, InMemoryUserRepository};
pub use product_repository::PgProductRepository;
pub use user_repository::PgUserRepository;

/// Build an `ILIKE` pattern matching `term` anywhere, with LIKE wildcards in
/// `term` escaped so they match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
