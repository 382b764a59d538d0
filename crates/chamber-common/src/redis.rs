/// Namespaced Redis key-value store with graceful degradation.
///
/// Every read returns `Option<T>` and every write returns `bool`. On any Redis
/// error the call logs a warning and degrades: reads behave like a missing key,
/// writes are dropped. Nothing in the directory requires Redis to be present.
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::warn;

use crate::error::CommonError;

#[derive(Clone)]
pub struct RedisStore {
    client: Option<redis::Client>,
    namespace: String,
}

impl RedisStore {
    /// Build a store for `url`. A `None` URL or an unparsable one yields a store
    /// that never touches the network.
    ///
    /// Every key passed to this store is prefixed with `namespace`.
    pub fn new(url: Option<&str>, namespace: &str) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "failed to create redis client, store disabled"))
                .ok()
        });
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }

    /// A store that is always unavailable.
    pub fn disabled(namespace: &str) -> Self {
        Self::new(None, namespace)
    }

    pub fn key(&self, key: &str) -> String {
        format!("{}{key}", self.namespace)
    }

    pub async fn ping(&self) -> Result<(), CommonError> {
        let mut conn = self.connect().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    pub async fn is_available(&self) -> bool {
        self.client.is_some() && self.ping().await.is_ok()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.try_connect().await?;
        let key = self.key(key);
        conn.get::<_, Option<String>>(&key)
            .await
            .inspect_err(|e| warn!(error = %e, key = %key, "redis GET failed"))
            .ok()?
    }

    pub async fn set(&self, key: &str, value: &str) -> bool {
        let Some(mut conn) = self.try_connect().await else {
            return false;
        };
        let key = self.key(key);
        conn.set::<_, _, ()>(&key, value)
            .await
            .inspect_err(|e| warn!(error = %e, key = %key, "redis SET failed"))
            .is_ok()
    }

    async fn connect(&self) -> Result<MultiplexedConnection, CommonError> {
        let Some(client) = &self.client else {
            return Err(CommonError::RedisUnavailable);
        };
        Ok(client.get_multiplexed_async_connection().await?)
    }

    async fn try_connect(&self) -> Option<MultiplexedConnection> {
        self.client.as_ref()?;
        self.connect()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::RedisStore;

    #[test]
    fn keys_are_namespaced() {
        let store = RedisStore::disabled("chamber:v1:");
        assert_eq!(store.key("visit:abc"), "chamber:v1:visit:abc");
    }

    #[tokio::test]
    async fn disabled_store_degrades() {
        let store = RedisStore::disabled("test:");
        assert!(!store.is_available().await);
        assert_eq!(store.get("missing").await, None);
        assert!(!store.set("k", "v").await);
    }

    #[test]
    fn invalid_url_disables_store() {
        let store = RedisStore::new(Some("not a url"), "test:");
        assert!(store.client.is_none());
    }
}
