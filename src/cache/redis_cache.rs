use std::future::Future;
use std::time::{Duration, Instant};

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::{BackendInfo, CacheError, CacheResult};

const SCAN_BATCH: usize = 100;

/// Redis connection with lazy reconnect.
///
/// One connection attempt is made on construction. While offline, a new
/// attempt is made at most once per `reconnect_interval`; every other call
/// fails fast with [`CacheError::Unavailable`]. Once connected, the
/// `ConnectionManager` handles dropped connections itself.
pub struct RedisCache {
    client: redis::Client,
    url: String,
    timeout: Duration,
    reconnect_interval: Duration,
    conn: RwLock<Option<ConnectionManager>>,
    last_attempt: Mutex<Option<Instant>>,
}

impl RedisCache {
    /// Parses `url` and makes the first connection attempt.
    ///
    /// Only an unparseable URL is an error; an unreachable server yields an
    /// offline cache.
    pub async fn connect(
        url: &str,
        timeout: Duration,
        reconnect_interval: Duration,
    ) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let cache = Self {
            client,
            url: redact_url(url),
            timeout,
            reconnect_interval,
            conn: RwLock::new(None),
            last_attempt: Mutex::new(Some(Instant::now())),
        };

        cache.try_connect().await;
        Ok(cache)
    }

    /// Connection URL with any password masked.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn is_connected(&self) -> bool {
        self.conn.read().await.is_some()
    }

    async fn try_connect(&self) -> Option<ConnectionManager> {
        let attempt = tokio::time::timeout(
            self.timeout,
            ConnectionManager::new(self.client.clone()),
        )
        .await;

        match attempt {
            Ok(Ok(conn)) => {
                info!("Connected to Redis at {}", self.url);
                *self.conn.write().await = Some(conn.clone());
                Some(conn)
            }
            Ok(Err(e)) => {
                warn!("Failed to connect to Redis at {}: {}", self.url, e);
                None
            }
            Err(_) => {
                warn!(
                    "Timed out connecting to Redis at {} after {:?}",
                    self.url, self.timeout
                );
                None
            }
        }
    }

    async fn connection(&self) -> CacheResult<ConnectionManager> {
        if let Some(conn) = self.conn.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let due = {
            let mut last = self.last_attempt.lock().await;
            let due = last.is_none_or(|t| t.elapsed() >= self.reconnect_interval);
            if due {
                *last = Some(Instant::now());
            }
            due
        };

        if due {
            debug!("Probing Redis at {}", self.url);
            if let Some(conn) = self.try_connect().await {
                return Ok(conn);
            }
        }

        Err(CacheError::Unavailable)
    }

    async fn run<T, F>(&self, op: F) -> CacheResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| CacheError::Timeout)?
            .map_err(CacheError::from)
    }

    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection().await?;
        self.run(conn.get(key)).await
    }

    pub async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        self.run(conn.set_ex(key, value, ttl.as_secs().max(1))).await
    }

    /// Lists keys starting with `prefix` using cursor-based `SCAN`.
    pub async fn keys(&self, prefix: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.connection().await?;
        let pattern = format!("{}*", escape_glob(prefix));
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = self
                .run(
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(&pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn),
                )
                .await?;

            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }

    pub async fn delete(&self, keys: &[String]) -> CacheResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection().await?;
        let _removed: usize = self.run(conn.del(keys)).await?;
        Ok(())
    }

    pub async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _pong: String = self.run(redis::cmd("PING").query_async(&mut conn)).await?;
        Ok(())
    }

    pub async fn info(&self) -> CacheResult<BackendInfo> {
        let mut conn = self.connection().await?;
        let info: redis::InfoDict = self.run(redis::cmd("INFO").query_async(&mut conn)).await?;

        Ok(BackendInfo {
            memory_used: info.get::<String>("used_memory_human"),
            uptime_seconds: info.get::<u64>("uptime_in_seconds"),
        })
    }
}

/// Escapes `SCAN MATCH` glob metacharacters so `prefix` matches literally.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Masks the password component of a connection URL.
#[must_use]
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("***")).is_err() {
                return raw.to_string();
            }
            parsed.to_string()
        }
        _ => raw.to_string(),
    }
}
