//! Domain service for the recipe catalog.
//!
//! Internal records are managed through the configured [`RecipeStore`];
//! search merges them with upstream results from [`ExternalSearchService`].

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::RecipeId;
use crate::models::{Recipe, RecipeFields};
use crate::services::ExternalSearchService;
use crate::storage::RecipeStore;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Recipe not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
    external: Arc<ExternalSearchService>,
}

impl RecipeService {
    #[must_use]
    pub fn new(store: Arc<dyn RecipeStore>, external: Arc<ExternalSearchService>) -> Self {
        Self { store, external }
    }

    fn validate(fields: &RecipeFields) -> Result<(), RecipeError> {
        if fields.title.trim().is_empty() {
            return Err(RecipeError::Validation("Title cannot be empty".to_string()));
        }
        Ok(())
    }

    /// External ids never name a stored record.
    fn internal_id(id: &RecipeId) -> Result<i32, RecipeError> {
        id.as_internal().ok_or(RecipeError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<Recipe>, RecipeError> {
        Ok(self.store.get_all().await?)
    }

    pub async fn get(&self, id: &RecipeId) -> Result<Recipe, RecipeError> {
        let id = Self::internal_id(id)?;
        self.store
            .get_by_id(id)
            .await?
            .ok_or(RecipeError::NotFound)
    }

    pub async fn create(&self, fields: RecipeFields) -> Result<Recipe, RecipeError> {
        Self::validate(&fields)?;
        let recipe = self.store.create(fields).await?;
        info!("Created recipe {} ({})", recipe.id, recipe.title());
        Ok(recipe)
    }

    pub async fn update(&self, id: &RecipeId, fields: RecipeFields) -> Result<Recipe, RecipeError> {
        let id = Self::internal_id(id)?;
        Self::validate(&fields)?;
        self.store
            .update(id, fields)
            .await?
            .ok_or(RecipeError::NotFound)
    }

    pub async fn delete(&self, id: &RecipeId) -> Result<(), RecipeError> {
        let id = Self::internal_id(id)?;
        if self.store.delete(id).await? {
            info!("Deleted recipe {}", id);
            Ok(())
        } else {
            Err(RecipeError::NotFound)
        }
    }

    /// Internal matches followed by upstream matches, without de-duplication.
    ///
    /// The two lookups run concurrently. The upstream side never fails; a
    /// storage failure on the internal side is returned.
    pub async fn search(&self, query: &str) -> Result<Vec<Recipe>, RecipeError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let (internal, external) =
            tokio::join!(self.store.search(query), self.external.search(query));

        let mut results = internal?;
        results.extend(external);
        Ok(results)
    }
}
