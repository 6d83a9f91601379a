//! Key/value store access.
//!
//! Carts are persisted as self-contained records in a key/value store with
//! native per-key expiry. [`KeyValueStore`] is the narrow surface the cart
//! repository needs; [`RedisStore`] is the production implementation.

use std::time::Duration;

use async_trait::async_trait;

mod errors;
mod redis_store;

pub use errors::StoreError;
pub use redis_store::{RedisStore, connect};

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored at `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` at `key`, replacing any previous value, expiring after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Remove every key in `keys`. Missing keys are ignored.
    async fn delete(&self, keys: &[String]) -> Result<(), StoreError>;

    /// List every key matching the glob `pattern`.
    async fn scan(&self, pattern: &str) -> Result<Vec<String>, StoreError>;
}
