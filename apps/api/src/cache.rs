//! Small TTL cache shared through `AppState` for listings fetched from remote feeds.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedValue<V> {
    value: V,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: Arc<RwLock<HashMap<K, CachedValue<V>>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the cached value if it has not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|cached| cached.expires_at > Instant::now())
            .map(|cached| cached.value.clone())
    }

    pub async fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CachedValue {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Returns the cached value or runs `load`, caching only successful results.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            debug!(key = ?key, "Cache hit");
            return Ok(value);
        }

        debug!(key = ?key, "Cache miss");
        let value = load().await?;
        self.insert(key, value.clone()).await;
        self.evict_expired().await;
        Ok(value)
    }

    async fn evict_expired(&self) {
        let now = Instant::now();
        self.entries
            .write()
            .await
            .retain(|_, cached| cached.expires_at > now);
    }
}
