use crate::cache::SearchCache;
use crate::config::Config;

pub async fn cmd_cache_stats(config: &Config) -> anyhow::Result<()> {
    let cache = SearchCache::from_config(&config.cache).await;
    let stats = cache.stats().await;

    println!("Cache backend: {}", stats.backend);
    if let Some(url) = &stats.url {
        println!("  URL: {url}");
    }

    if !stats.connected {
        println!("  Status: unavailable");
        if let Some(error) = &stats.error {
            println!("  Error: {error}");
        }
        return Ok(());
    }

    println!("  Status: connected");
    println!(
        "  Cached queries: {}",
        stats.cached_queries.unwrap_or_default()
    );
    if let Some(memory) = &stats.memory_used {
        println!("  Memory used: {memory}");
    }
    if let Some(uptime) = stats.uptime_seconds {
        println!("  Uptime: {uptime}s");
    }

    Ok(())
}

pub async fn cmd_cache_clear(config: &Config) -> anyhow::Result<()> {
    let cache = SearchCache::from_config(&config.cache).await;

    if cache.clear().await {
        println!("✓ Cache cleared");
        Ok(())
    } else {
        anyhow::bail!("Cache clear failed ({} backend unavailable)", cache.backend_name())
    }
}
