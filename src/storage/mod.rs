//! Recipe persistence.
//!
//! [`RecipeStore`] is the contract both backends satisfy. The backend is
//! chosen once at startup from [`StorageConfig`] and shared behind an `Arc`.

mod memory;
mod seed;
mod sqlite;

pub use memory::MemoryRecipeStore;
pub use seed::sample_recipes;
pub use sqlite::SqliteRecipeStore;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::{StorageBackend, StorageConfig};
use crate::models::{Recipe, RecipeFields};

/// Persistence contract for internal recipes.
///
/// Only internal (integer) identifiers reach this layer; rejecting external
/// ids is the caller's job.
#[async_trait::async_trait]
pub trait RecipeStore: Send + Sync {
    /// All records. The durable backend orders by id, the in-memory backend
    /// by insertion.
    async fn get_all(&self) -> Result<Vec<Recipe>>;

    async fn get_by_id(&self, id: i32) -> Result<Option<Recipe>>;

    /// Stores a new record under the next unused id.
    async fn create(&self, fields: RecipeFields) -> Result<Recipe>;

    /// Replaces every field except the id. `None` when `id` is unknown.
    async fn update(&self, id: i32, fields: RecipeFields) -> Result<Option<Recipe>>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: i32) -> Result<bool>;

    /// Case-insensitive substring match on titles. An empty query yields
    /// an empty result rather than every record.
    async fn search(&self, query: &str) -> Result<Vec<Recipe>>;

    /// Short name used in logs and diagnostics.
    fn backend_name(&self) -> &'static str;
}

/// Builds the storage backend selected by configuration.
pub async fn build_store(config: &StorageConfig) -> Result<Arc<dyn RecipeStore>> {
    let store: Arc<dyn RecipeStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryRecipeStore::new()),
        StorageBackend::Sqlite => Arc::new(
            SqliteRecipeStore::open_with_pool_options(
                &config.database_path,
                config.max_db_connections,
                config.min_db_connections,
            )
            .await?,
        ),
    };

    info!("Using {} recipe storage", store.backend_name());
    Ok(store)
}
