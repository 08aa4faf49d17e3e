use std::sync::Arc;
use std::time::Duration;

use crate::cache::SearchCache;
use crate::clients::{MealDbClient, MealSource};
use crate::config::Config;
use crate::services::{ExternalSearchService, RecipeService};
use crate::storage::{RecipeStore, build_store};

/// Build a shared HTTP client for upstream API calls.
/// Reused across services so connections are pooled.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("recipebox/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Arc<dyn RecipeStore>,

    pub cache: Arc<SearchCache>,

    pub recipes: Arc<RecipeService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = build_store(&config.storage).await?;

        let http_client = build_shared_http_client(config.mealdb.request_timeout_seconds)?;
        let source = Arc::new(MealDbClient::with_shared_client(
            http_client,
            config.mealdb.base_url.clone(),
        ));

        Self::with_components(config, store, source).await
    }

    /// Wires the services around an already-built store and upstream source.
    pub async fn with_components(
        config: Config,
        store: Arc<dyn RecipeStore>,
        source: Arc<dyn MealSource>,
    ) -> anyhow::Result<Self> {
        let cache = Arc::new(SearchCache::from_config(&config.cache).await);

        let external = Arc::new(ExternalSearchService::new(
            source,
            cache.clone(),
            Duration::from_secs(config.mealdb.request_timeout_seconds),
        ));

        let recipes = Arc::new(RecipeService::new(store.clone(), external));

        Ok(Self {
            config: Arc::new(config),
            store,
            cache,
            recipes,
        })
    }
}
