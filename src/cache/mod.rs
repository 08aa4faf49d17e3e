//! Search result cache for external recipe lookups.
//!
//! ```text
//! SearchCache                  <- namespacing, (de)serialization, error swallowing
//!   └── CacheProvider (enum)
//!         ├── Redis(RedisCache)   <- ConnectionManager, lazy reconnect
//!         ├── Memory(MemoryCache) <- in-process map with TTL
//!         └── Disabled            <- always miss, never writes
//! ```
//!
//! The cache is strictly an optimization: no method on [`SearchCache`]
//! returns an error. Backend failures become misses or `false`.

mod memory_cache;
mod redis_cache;

pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{CacheBackend, CacheConfig};
use crate::models::Recipe;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable")]
    Unavailable,

    #[error("cache operation timed out")]
    Timeout,

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("malformed cached payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Metrics reported by the backend itself.
#[derive(Debug, Clone, Default)]
pub struct BackendInfo {
    pub memory_used: Option<String>,
    pub uptime_seconds: Option<u64>,
}

/// Diagnostic snapshot returned by `GET /admin/cache/stats`.
///
/// `cached_queries` is absent when the backend cannot be reached, which is
/// distinct from `Some(0)`.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub backend: &'static str,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_queries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub enum CacheProvider {
    Redis(RedisCache),
    Memory(MemoryCache),
    Disabled,
}

impl CacheProvider {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Redis(_) => "redis",
            Self::Memory(_) => "memory",
            Self::Disabled => "disabled",
        }
    }

    fn url(&self) -> Option<String> {
        match self {
            Self::Redis(redis) => Some(redis.url().to_string()),
            Self::Memory(_) | Self::Disabled => None,
        }
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            Self::Redis(redis) => redis.get(key).await,
            Self::Memory(memory) => memory.get(key).await,
            Self::Disabled => Err(CacheError::Unavailable),
        }
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        match self {
            Self::Redis(redis) => redis.set_ex(key, value, ttl).await,
            Self::Memory(memory) => memory.set_ex(key, value, ttl).await,
            Self::Disabled => Err(CacheError::Unavailable),
        }
    }

    async fn keys(&self, prefix: &str) -> CacheResult<Vec<String>> {
        match self {
            Self::Redis(redis) => redis.keys(prefix).await,
            Self::Memory(memory) => memory.keys(prefix).await,
            Self::Disabled => Err(CacheError::Unavailable),
        }
    }

    async fn delete(&self, keys: &[String]) -> CacheResult<()> {
        match self {
            Self::Redis(redis) => redis.delete(keys).await,
            Self::Memory(memory) => memory.delete(keys).await,
            Self::Disabled => Err(CacheError::Unavailable),
        }
    }

    async fn ping(&self) -> CacheResult<()> {
        match self {
            Self::Redis(redis) => redis.ping().await,
            Self::Memory(_) => Ok(()),
            Self::Disabled => Err(CacheError::Unavailable),
        }
    }

    async fn info(&self) -> CacheResult<BackendInfo> {
        match self {
            Self::Redis(redis) => redis.info().await,
            Self::Memory(memory) => {
                let mut info = memory.info();
                info.memory_used = Some(format!("{}B", memory.payload_bytes().await));
                Ok(info)
            }
            Self::Disabled => Err(CacheError::Unavailable),
        }
    }
}

/// Namespaced, TTL-bounded cache of external search results keyed by the
/// lower-cased query.
pub struct SearchCache {
    provider: CacheProvider,
    namespace: String,
    ttl: Duration,
}

impl SearchCache {
    #[must_use]
    pub fn new(provider: CacheProvider, namespace: impl Into<String>, ttl: Duration) -> Self {
        Self {
            provider,
            namespace: namespace.into(),
            ttl,
        }
    }

    /// Builds the configured backend. Never fails: an unusable Redis URL
    /// degrades to a disabled cache.
    pub async fn from_config(config: &CacheConfig) -> Self {
        let provider = match config.backend {
            CacheBackend::Redis => match RedisCache::connect(
                &config.redis_url,
                Duration::from_millis(config.connect_timeout_ms),
                Duration::from_secs(config.reconnect_interval_seconds),
            )
            .await
            {
                Ok(redis) => CacheProvider::Redis(redis),
                Err(e) => {
                    warn!("Cache disabled, invalid Redis URL: {}", e);
                    CacheProvider::Disabled
                }
            },
            CacheBackend::Memory => CacheProvider::Memory(MemoryCache::new()),
            CacheBackend::Disabled => CacheProvider::Disabled,
        };

        Self::new(
            provider,
            config.namespace.clone(),
            Duration::from_secs(config.ttl_hours.saturating_mul(3600)),
        )
    }

    /// In-process cache with the default namespace and TTL.
    #[must_use]
    pub fn in_memory() -> Self {
        let defaults = CacheConfig::default();
        Self::new(
            CacheProvider::Memory(MemoryCache::new()),
            defaults.namespace,
            Duration::from_secs(defaults.ttl_hours * 3600),
        )
    }

    #[must_use]
    pub fn disabled() -> Self {
        let defaults = CacheConfig::default();
        Self::new(
            CacheProvider::Disabled,
            defaults.namespace,
            Duration::from_secs(defaults.ttl_hours * 3600),
        )
    }

    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        self.provider.name()
    }

    fn prefix(&self) -> String {
        format!("{}:", self.namespace)
    }

    fn key(&self, query: &str) -> String {
        format!("{}:{}", self.namespace, query.to_lowercase())
    }

    /// Cached results for `query`. `None` means not cached or unavailable;
    /// `Some(vec![])` is a cached negative result.
    pub async fn get(&self, query: &str) -> Option<Vec<Recipe>> {
        if query.is_empty() {
            return None;
        }

        let raw = match self.provider.get(&self.key(query)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                metrics::counter!("cache_misses_total").increment(1);
                return None;
            }
            Err(CacheError::Unavailable) => return None,
            Err(e) => {
                metrics::counter!("cache_errors_total").increment(1);
                warn!("Cache get error: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<Recipe>>(&raw) {
            Ok(recipes) => {
                metrics::counter!("cache_hits_total").increment(1);
                debug!("Cache HIT for query: {}", query);
                Some(recipes)
            }
            Err(e) => {
                metrics::counter!("cache_errors_total").increment(1);
                warn!("Discarding malformed cache entry for '{}': {}", query, e);
                None
            }
        }
    }

    /// Best-effort write. Returns whether the entry was stored.
    pub async fn set(&self, query: &str, results: &[Recipe]) -> bool {
        if query.is_empty() {
            return false;
        }

        let payload = match serde_json::to_string(results) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to serialize cache entry: {}", e);
                return false;
            }
        };

        match self.provider.set_ex(&self.key(query), payload, self.ttl).await {
            Ok(()) => {
                debug!("Cached {} results for query: {}", results.len(), query);
                true
            }
            Err(CacheError::Unavailable) => false,
            Err(e) => {
                metrics::counter!("cache_errors_total").increment(1);
                warn!("Cache set error: {}", e);
                false
            }
        }
    }

    /// Removes every entry under this cache's namespace.
    pub async fn clear(&self) -> bool {
        let prefix = self.prefix();
        let result = async {
            let keys = self.provider.keys(&prefix).await?;
            self.provider.delete(&keys).await?;
            Ok::<usize, CacheError>(keys.len())
        }
        .await;

        match result {
            Ok(count) => {
                debug!("Cleared {} cache entries", count);
                true
            }
            Err(e) => {
                warn!("Cache clear error: {}", e);
                false
            }
        }
    }

    pub async fn health_check(&self) -> bool {
        self.provider.ping().await.is_ok()
    }

    pub async fn stats(&self) -> CacheStats {
        let backend = self.provider.name();
        let url = self.provider.url();

        let result = async {
            let keys = self.provider.keys(&self.prefix()).await?;
            let info = self.provider.info().await?;
            Ok::<_, CacheError>((keys.len(), info))
        }
        .await;

        match result {
            Ok((cached_queries, info)) => CacheStats {
                backend,
                connected: true,
                url,
                cached_queries: Some(cached_queries),
                memory_used: info.memory_used,
                uptime_seconds: info.uptime_seconds,
                error: None,
            },
            Err(e) => {
                let error = match (&self.provider, &e) {
                    (CacheProvider::Disabled, _) => "Cache is disabled".to_string(),
                    (_, CacheError::Unavailable) => format!(
                        "Cannot connect to {backend} at {}",
                        url.as_deref().unwrap_or("unknown")
                    ),
                    _ => e.to_string(),
                };

                CacheStats {
                    backend,
                    connected: false,
                    url,
                    cached_queries: None,
                    memory_used: None,
                    uptime_seconds: None,
                    error: Some(error),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecipeId, RecipeSource};
    use crate::models::RecipeFields;

    fn external(upstream: &str, title: &str) -> Recipe {
        Recipe {
            id: RecipeId::external(upstream),
            fields: RecipeFields {
                title: title.to_string(),
                ingredients: vec!["1 cup rice".to_string()],
                steps: vec!["Cook".to_string()],
                prep_time: "Unknown".to_string(),
                cook_time: "Unknown".to_string(),
                difficulty: "Medium".to_string(),
                cuisine: "Japanese".to_string(),
            },
            source: RecipeSource::Mealdb,
            image: None,
            video: None,
            original_id: Some(upstream.to_string()),
        }
    }

    #[tokio::test]
    async fn keys_are_case_normalized() {
        let cache = SearchCache::in_memory();
        let results = vec![external("1", "Teriyaki Chicken")];

        assert!(cache.set("Chicken", &results).await);
        assert_eq!(cache.get("chicken").await, Some(results.clone()));
        assert_eq!(cache.get("CHICKEN").await, Some(results));
    }

    #[tokio::test]
    async fn empty_result_is_a_hit() {
        let cache = SearchCache::in_memory();
        assert_eq!(cache.get("zzz").await, None);
        assert!(cache.set("zzz", &[]).await);
        assert_eq!(cache.get("zzz").await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn empty_query_is_never_cached() {
        let cache = SearchCache::in_memory();
        assert!(!cache.set("", &[]).await);
        assert_eq!(cache.get("").await, None);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_miss() {
        let memory = MemoryCache::new();
        memory
            .set_ex("mealdb:search:bad", "{not json".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        let cache = SearchCache::new(
            CacheProvider::Memory(memory),
            "mealdb:search",
            Duration::from_secs(60),
        );

        assert_eq!(cache.get("bad").await, None);
    }

    #[tokio::test]
    async fn clear_only_touches_namespace() {
        let memory = MemoryCache::new();
        memory
            .set_ex("unrelated", "keep".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        let cache = SearchCache::new(
            CacheProvider::Memory(memory),
            "mealdb:search",
            Duration::from_secs(60),
        );
        cache.set("a", &[]).await;
        cache.set("b", &[]).await;

        assert_eq!(cache.stats().await.cached_queries, Some(2));
        assert!(cache.clear().await);
        assert_eq!(cache.stats().await.cached_queries, Some(0));

        let CacheProvider::Memory(memory) = &cache.provider else {
            panic!("expected memory provider");
        };
        assert_eq!(memory.get("unrelated").await.unwrap().as_deref(), Some("keep"));
    }

    #[tokio::test]
    async fn disabled_cache_degrades_quietly() {
        let cache = SearchCache::disabled();
        assert!(!cache.set("x", &[]).await);
        assert_eq!(cache.get("x").await, None);
        assert!(!cache.clear().await);
        assert!(!cache.health_check().await);

        let stats = cache.stats().await;
        assert!(!stats.connected);
        assert_eq!(stats.cached_queries, None);
        assert!(stats.error.is_some());
    }

    #[tokio::test]
    async fn stats_reports_counts_when_available() {
        let cache = SearchCache::in_memory();
        cache.set("one", &[external("1", "One")]).await;

        let stats = cache.stats().await;
        assert!(stats.connected);
        assert_eq!(stats.backend, "memory");
        assert_eq!(stats.cached_queries, Some(1));
        assert!(cache.health_check().await);
    }

    #[tokio::test]
    async fn unreachable_redis_behaves_as_disabled() {
        let config = CacheConfig {
            redis_url: "redis://127.0.0.1:1".to_string(),
            connect_timeout_ms: 200,
            reconnect_interval_seconds: 3600,
            ..CacheConfig::default()
        };
        let cache = SearchCache::from_config(&config).await;

        assert_eq!(cache.backend_name(), "redis");
        assert!(!cache.set("x", &[]).await);
        assert_eq!(cache.get("x").await, None);
        assert!(!cache.health_check().await);

        let stats = cache.stats().await;
        assert!(!stats.connected);
        assert_eq!(stats.cached_queries, None);
        assert_eq!(stats.url.as_deref(), Some("redis://127.0.0.1:1"));
    }
}
