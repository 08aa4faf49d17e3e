//! Cache-aside search against the upstream meal catalog.
//!
//! Every outcome is recovered locally: callers always receive a list,
//! possibly empty, never an error.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::cache::SearchCache;
use crate::clients::{Meal, MealSource};
use crate::models::Recipe;

pub struct ExternalSearchService {
    source: Arc<dyn MealSource>,
    cache: Arc<SearchCache>,
    timeout: Duration,
}

impl ExternalSearchService {
    #[must_use]
    pub fn new(source: Arc<dyn MealSource>, cache: Arc<SearchCache>, timeout: Duration) -> Self {
        Self {
            source,
            cache,
            timeout,
        }
    }

    /// Searches the upstream catalog.
    ///
    /// 1. cache hit (including a cached empty list): returned verbatim
    /// 2. miss, upstream ok: transformed, written through, returned
    /// 3. miss, upstream failed: one more cache read, else empty
    pub async fn search(&self, query: &str) -> Vec<Recipe> {
        if query.is_empty() {
            return Vec::new();
        }

        if let Some(cached) = self.cache.get(query).await {
            return cached;
        }

        match self.fetch(query).await {
            Ok(recipes) => {
                self.cache.set(query, &recipes).await;
                recipes
            }
            Err(e) => {
                warn!("MealDB search for '{}' failed: {:#}", query, e);
                match self.cache.get(query).await {
                    Some(stale) => {
                        debug!("Serving cached results for '{}' after upstream failure", query);
                        stale
                    }
                    None => Vec::new(),
                }
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Recipe>> {
        let meals = match tokio::time::timeout(self.timeout, self.source.search_meals(query)).await
        {
            Ok(Ok(meals)) => meals,
            Ok(Err(e)) => {
                metrics::counter!("mealdb_requests_total", "outcome" => "error").increment(1);
                return Err(e);
            }
            Err(_) => {
                metrics::counter!("mealdb_requests_total", "outcome" => "timeout").increment(1);
                anyhow::bail!("request timed out after {}s", self.timeout.as_secs_f32());
            }
        };

        metrics::counter!("mealdb_requests_total", "outcome" => "success").increment(1);
        debug!("MealDB returned {} meals for '{}'", meals.len(), query);

        Ok(meals.into_iter().map(Meal::into_recipe).collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn meal(id: &str, name: &str) -> Meal {
        Meal {
            id_meal: id.to_string(),
            str_meal: Some(name.to_string()),
            str_instructions: Some("Cook. Serve.".to_string()),
            str_area: Some("British".to_string()),
            ..Meal::default()
        }
    }

    /// Returns fixed meals and counts calls.
    #[derive(Default)]
    pub(crate) struct StubSource {
        pub meals: Vec<Meal>,
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl MealSource for StubSource {
        async fn search_meals(&self, _query: &str) -> Result<Vec<Meal>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.meals.clone())
        }
    }

    pub(crate) struct FailingSource;

    #[async_trait]
    impl MealSource for FailingSource {
        async fn search_meals(&self, _query: &str) -> Result<Vec<Meal>> {
            anyhow::bail!("503 Service Unavailable")
        }
    }

    struct SlowSource;

    #[async_trait]
    impl MealSource for SlowSource {
        async fn search_meals(&self, _query: &str) -> Result<Vec<Meal>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![meal("1", "Never")])
        }
    }

    /// Populates the cache behind the caller's back, then fails.
    struct RacingSource {
        cache: Arc<SearchCache>,
        stale: Vec<Recipe>,
    }

    #[async_trait]
    impl MealSource for RacingSource {
        async fn search_meals(&self, query: &str) -> Result<Vec<Meal>> {
            self.cache.set(query, &self.stale).await;
            anyhow::bail!("connection reset")
        }
    }

    fn service(source: Arc<dyn MealSource>, cache: Arc<SearchCache>) -> ExternalSearchService {
        ExternalSearchService::new(source, cache, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn empty_query_skips_cache_and_upstream() {
        let source = Arc::new(StubSource {
            meals: vec![meal("1", "Pie")],
            ..StubSource::default()
        });
        let svc = service(source.clone(), Arc::new(SearchCache::in_memory()));

        assert!(svc.search("").await.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_search_is_served_from_cache() {
        let source = Arc::new(StubSource {
            meals: vec![meal("52772", "Teriyaki Chicken Casserole")],
            ..StubSource::default()
        });
        let svc = service(source.clone(), Arc::new(SearchCache::in_memory()));

        let first = svc.search("Chicken").await;
        let second = svc.search("chicken").await;

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_upstream_result_is_cached() {
        let source = Arc::new(StubSource::default());
        let svc = service(source.clone(), Arc::new(SearchCache::in_memory()));

        assert!(svc.search("xyzzy").await.is_empty());
        assert!(svc.search("xyzzy").await.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_empty() {
        let svc = service(Arc::new(FailingSource), Arc::new(SearchCache::in_memory()));
        assert!(svc.search("chicken").await.is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_serves_stale_entry() {
        let cache = Arc::new(SearchCache::in_memory());
        let stale = vec![meal("9", "Old Pie").into_recipe()];
        let source = Arc::new(RacingSource {
            cache: cache.clone(),
            stale: stale.clone(),
        });
        let svc = service(source, cache);

        assert_eq!(svc.search("pie").await, stale);
    }

    #[tokio::test]
    async fn slow_upstream_is_bounded() {
        let svc = ExternalSearchService::new(
            Arc::new(SlowSource),
            Arc::new(SearchCache::in_memory()),
            Duration::from_millis(50),
        );

        let started = std::time::Instant::now();
        assert!(svc.search("anything").await.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn works_without_cache() {
        let source = Arc::new(StubSource {
            meals: vec![meal("1", "Stew")],
            ..StubSource::default()
        });
        let svc = service(source.clone(), Arc::new(SearchCache::disabled()));

        assert_eq!(svc.search("stew").await.len(), 1);
        assert_eq!(svc.search("stew").await.len(), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
