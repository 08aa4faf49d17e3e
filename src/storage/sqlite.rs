use anyhow::Result;

use super::{RecipeStore, sample_recipes};
use crate::db::Store;
use crate::models::{Recipe, RecipeFields};

/// Durable recipe storage in a single SQLite file.
///
/// Opening runs migrations and seeds the sample recipes into an empty table,
/// so reopening an existing file never duplicates them.
#[derive(Clone)]
pub struct SqliteRecipeStore {
    store: Store,
}

impl SqliteRecipeStore {
    pub async fn open(db_url: &str) -> Result<Self> {
        Self::from_store(Store::new(db_url).await?).await
    }

    pub async fn open_with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        let store = Store::with_pool_options(db_url, max_connections, min_connections).await?;
        Self::from_store(store).await
    }

    async fn from_store(store: Store) -> Result<Self> {
        store.seed_recipes(&sample_recipes()).await?;
        Ok(Self { store })
    }

    /// Deletes every recipe and resets id assignment. Intended for tests.
    pub async fn clear(&self) -> Result<()> {
        self.store.clear_recipes().await
    }

    pub async fn close(self) -> Result<()> {
        self.store.close().await
    }
}

#[async_trait::async_trait]
impl RecipeStore for SqliteRecipeStore {
    async fn get_all(&self) -> Result<Vec<Recipe>> {
        self.store.list_recipes().await
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Recipe>> {
        self.store.get_recipe(id).await
    }

    async fn create(&self, fields: RecipeFields) -> Result<Recipe> {
        self.store.add_recipe(&fields).await
    }

    async fn update(&self, id: i32, fields: RecipeFields) -> Result<Option<Recipe>> {
        self.store.update_recipe(id, &fields).await
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        self.store.remove_recipe(id).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Recipe>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        // Matching happens in Rust so both backends agree on Unicode casing
        // and on titles containing LIKE wildcards.
        let all = self.store.list_recipes().await?;
        Ok(all
            .into_iter()
            .filter(|r| r.fields.title_matches(query))
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
