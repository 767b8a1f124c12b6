//! In-memory Repositories
//!
//! Vec-backed implementations of the domain repository traits with a
//! monotonically increasing id counter per repository. Shared state sits behind
//! a `parking_lot::RwLock`; no guard is ever held across an `.await`.

mod category;
mod product;
mod user;

pub use category::InMemoryCategoryRepository;
pub use product::InMemoryProductRepository;
pub use user::InMemoryUserRepository;
