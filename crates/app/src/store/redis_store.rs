//! Redis-backed store.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};

use crate::store::{KeyValueStore, StoreError};

const SCAN_BATCH_SIZE: usize = 200;

/// Open a Redis client and build a managed, auto-reconnecting connection.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the server cannot be reached.
pub async fn connect(redis_url: &str) -> Result<ConnectionManager, StoreError> {
    let client = Client::open(redis_url)?;

    Ok(client.get_connection_manager().await?)
}

/// Whole seconds for `EX`, rounded up so Redis never drops a key before its
/// TTL has elapsed. Redis rejects `EX 0`.
fn expiry_seconds(ttl: Duration) -> u64 {
    let partial = u64::from(ttl.subsec_nanos() > 0);

    ttl.as_secs().saturating_add(partial).max(1)
}

/// [`KeyValueStore`] over a Redis connection manager.
///
/// The manager multiplexes a single connection and is cheap to clone, so each
/// call works on its own handle.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    #[must_use]
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection.clone();

        let value: Option<String> = connection.get(key).await?;

        Ok(value)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();

        let () = connection.set_ex(key, value, expiry_seconds(ttl)).await?;

        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StoreError> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut connection = self.connection.clone();

        let _removed: u64 = connection.del(keys).await?;

        Ok(())
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut connection = self.connection.clone();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH_SIZE)
                .query_async(&mut connection)
                .await?;

            keys.extend(batch);

            if next == 0 {
                break;
            }

            cursor = next;
        }

        // SCAN may return a key more than once across iterations.
        keys.sort_unstable();
        keys.dedup();

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use testcontainers::runners::AsyncRunner;
    use testcontainers_modules::redis::{REDIS_PORT, Redis};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn expiry_seconds_round_up() {
        assert_eq!(expiry_seconds(Duration::from_millis(59_001)), 60);
        assert_eq!(expiry_seconds(Duration::from_secs(60)), 60);
        assert_eq!(expiry_seconds(Duration::from_millis(1)), 1);
        assert_eq!(expiry_seconds(Duration::ZERO), 1);
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn round_trips_values_against_a_real_server() -> TestResult {
        let container = Redis::default().start().await?;
        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(REDIS_PORT).await?;

        let store = RedisStore::new(connect(&format!("redis://{host}:{port}")).await?);

        store
            .set_with_ttl("cart:id:a", "{}", Duration::from_secs(60))
            .await?;
        store
            .set_with_ttl("cart:id:b", "{}", Duration::from_secs(60))
            .await?;
        store
            .set_with_ttl("other:c", "{}", Duration::from_secs(60))
            .await?;

        assert_eq!(store.get("cart:id:a").await?.as_deref(), Some("{}"));
        assert_eq!(
            store.scan("cart:id:*").await?,
            vec!["cart:id:a".to_string(), "cart:id:b".to_string()]
        );

        store
            .delete(&["cart:id:a".to_string(), "cart:id:missing".to_string()])
            .await?;

        assert_eq!(store.get("cart:id:a").await?, None);

        Ok(())
    }
}
