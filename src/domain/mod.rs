//! # Domain Layer
//!
//! The domain layer contains the core business rules of the inventory service.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (Product, Category, User) and their
//!   repository traits
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Entities cannot hold a value that breaks their rules
//! - Repository traits define data access contracts

pub mod entities;

// Re-export commonly used types
pub use entities::*;
