//! # Domain Entities
//!
//! Core domain entities of the inventory service.
//!
//! - **Product**: a stocked item with name, SKU, price and quantity on hand
//! - **Category**: a grouping of products, used by the analytics service
//! - **User**: a person with access to the inventory
//!
//! Entity fields are private. Every assignment goes through a setter that
//! normalises the value (trim, case conversion) and returns
//! `AppError::Validation` when a rule is broken.
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod category;
mod product;
mod user;

pub use category::{Category, CategoryRepository};
pub use product::{canonical_sku, Product, ProductRepository, MAX_PRICE};
pub use user::{User, UserRepository};

#[cfg(test)]
pub use category::MockCategoryRepository;
#[cfg(test)]
pub use product::MockProductRepository;
#[cfg(test)]
pub use user::MockUserRepository;
