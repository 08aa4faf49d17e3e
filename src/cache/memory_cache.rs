use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::{BackendInfo, CacheResult};

struct Entry {
    value: String,
    /// `None` when the TTL overflows `Instant`; such entries never expire.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// In-process cache backend with per-entry expiry.
///
/// Expired entries are dropped lazily when read or enumerated.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    started: Instant,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            started: Instant::now(),
        }
    }

    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        self.entries.write().await.remove(key);
        Ok(None)
    }

    pub async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let entry = Entry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    pub async fn keys(&self, prefix: &str) -> CacheResult<Vec<String>> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));

        let mut keys: Vec<String> = entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort_unstable();
        Ok(keys)
    }

    pub async fn delete(&self, keys: &[String]) -> CacheResult<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    pub fn info(&self) -> BackendInfo {
        BackendInfo {
            memory_used: None,
            uptime_seconds: Some(self.started.elapsed().as_secs()),
        }
    }

    /// Approximate payload size of live entries, in bytes.
    pub async fn payload_bytes(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .iter()
            .filter(|(_, e)| e.is_live(now))
            .map(|(k, e)| k.len() + e.value.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_reads_back() {
        let cache = MemoryCache::new();
        cache
            .set_ex("ns:a", "[]".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("ns:a").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(cache.get("ns:b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn entries_expire() {
        let cache = MemoryCache::new();
        cache
            .set_ex("ns:a", "x".to_string(), Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.get("ns:a").await.unwrap(), None);
        assert!(cache.keys("ns:").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn keys_are_scoped_by_prefix() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set_ex("ns:a", "1".into(), ttl).await.unwrap();
        cache.set_ex("ns:b", "2".into(), ttl).await.unwrap();
        cache.set_ex("other:c", "3".into(), ttl).await.unwrap();

        let keys = cache.keys("ns:").await.unwrap();
        assert_eq!(keys, vec!["ns:a".to_string(), "ns:b".to_string()]);

        cache.delete(&keys).await.unwrap();
        assert_eq!(cache.get("other:c").await.unwrap().as_deref(), Some("3"));
        assert!(cache.keys("ns:").await.unwrap().is_empty());
    }
}
