use anyhow::Result;
use tokio::sync::RwLock;

use super::{RecipeStore, sample_recipes};
use crate::models::{Recipe, RecipeFields};

struct Inner {
    recipes: Vec<Recipe>,
    next_id: i32,
}

/// Process-lifetime recipe storage.
///
/// A single lock guards the whole collection; writers are serialized, which
/// is all the concurrency control a handful of recipes needs.
pub struct MemoryRecipeStore {
    inner: RwLock<Inner>,
}

impl Default for MemoryRecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecipeStore {
    /// Creates a store holding the sample recipes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_recipes(sample_recipes())
    }

    /// Creates an empty store.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_recipes(Vec::new())
    }

    fn with_recipes(samples: Vec<RecipeFields>) -> Self {
        let recipes: Vec<Recipe> = (1..)
            .zip(samples)
            .map(|(id, fields)| Recipe::internal(id, fields))
            .collect();
        let next_id = i32::try_from(recipes.len()).unwrap_or(i32::MAX - 1) + 1;

        Self {
            inner: RwLock::new(Inner { recipes, next_id }),
        }
    }
}

#[async_trait::async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn get_all(&self) -> Result<Vec<Recipe>> {
        Ok(self.inner.read().await.recipes.clone())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Recipe>> {
        let inner = self.inner.read().await;
        Ok(inner
            .recipes
            .iter()
            .find(|r| r.id.as_internal() == Some(id))
            .cloned())
    }

    async fn create(&self, fields: RecipeFields) -> Result<Recipe> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id = id
            .checked_add(1)
            .ok_or_else(|| anyhow::anyhow!("Recipe id space exhausted"))?;

        let recipe = Recipe::internal(id, fields);
        inner.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn update(&self, id: i32, fields: RecipeFields) -> Result<Option<Recipe>> {
        let mut inner = self.inner.write().await;
        let Some(slot) = inner
            .recipes
            .iter_mut()
            .find(|r| r.id.as_internal() == Some(id))
        else {
            return Ok(None);
        };

        slot.fields = fields;
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.recipes.len();
        inner.recipes.retain(|r| r.id.as_internal() != Some(id));
        Ok(inner.recipes.len() != before)
    }

    async fn search(&self, query: &str) -> Result<Vec<Recipe>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let inner = self.inner.read().await;
        Ok(inner
            .recipes
            .iter()
            .filter(|r| r.fields.title_matches(query))
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pancakes() -> RecipeFields {
        RecipeFields {
            title: "Test Pancakes".to_string(),
            ingredients: vec!["flour".into(), "milk".into(), "egg".into(), "sugar".into()],
            steps: vec!["Mix".into(), "Cook".into()],
            prep_time: "5 minutes".to_string(),
            cook_time: "10 minutes".to_string(),
            difficulty: "Easy".to_string(),
            cuisine: "American".to_string(),
        }
    }

    #[tokio::test]
    async fn starts_with_samples_in_insertion_order() {
        let store = MemoryRecipeStore::new();
        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title(), "Spaghetti Carbonara");
        assert_eq!(all[1].title(), "Chicken Curry");
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let store = MemoryRecipeStore::new();
        let created = store.create(pancakes()).await.unwrap();
        assert_eq!(created.id.as_internal(), Some(3));

        let fetched = store.get_by_id(3).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryRecipeStore::new();
        let created = store.create(pancakes()).await.unwrap();
        let id = created.id.as_internal().unwrap();

        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());

        let again = store.create(pancakes()).await.unwrap();
        assert_eq!(again.id.as_internal(), Some(id + 1));
    }

    #[tokio::test]
    async fn update_keeps_id_and_leaves_others_alone() {
        let store = MemoryRecipeStore::new();
        let mut fields = pancakes();
        fields.title = "Updated Carbonara".to_string();

        let updated = store.update(1, fields).await.unwrap().unwrap();
        assert_eq!(updated.id.as_internal(), Some(1));
        assert_eq!(updated.title(), "Updated Carbonara");

        let other = store.get_by_id(2).await.unwrap().unwrap();
        assert_eq!(other.title(), "Chicken Curry");

        assert!(store.update(999, pancakes()).await.unwrap().is_none());
        assert_eq!(store.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_empty_matches_nothing() {
        let store = MemoryRecipeStore::new();
        let lower = store.search("carbonara").await.unwrap();
        let upper = store.search("CARBONARA").await.unwrap();
        assert_eq!(lower.len(), 1);
        assert_eq!(lower, upper);

        assert!(store.search("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_store_starts_at_one() {
        let store = MemoryRecipeStore::empty();
        assert!(store.get_all().await.unwrap().is_empty());
        let created = store.create(pancakes()).await.unwrap();
        assert_eq!(created.id.as_internal(), Some(1));
    }
}
