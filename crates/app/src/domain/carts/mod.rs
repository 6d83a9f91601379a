//! Carts

pub mod cleanup;
pub mod data;
pub mod errors;
pub mod models;
pub mod repository;
pub mod service;

pub use cleanup::{CartCleanupScheduler, DEFAULT_CLEANUP_INTERVAL};
pub use errors::{CartsRepositoryError, CartsServiceError, ErrorKind};
pub use repository::{CartsRepository, DEFAULT_CART_TTL, MockCartsRepository, RedisCartsRepository};
pub use service::*;
