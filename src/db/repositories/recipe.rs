use crate::entities::{prelude::*, recipes};
use crate::models::{Recipe, RecipeFields};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryOrder, Set, Statement, TransactionTrait,
};
use tracing::{debug, info};

/// Repository for recipe rows.
///
/// Every public method opens its own transaction, so a call either commits
/// all of its writes or none of them.
pub struct RecipeRepository {
    conn: DatabaseConnection,
}

impl RecipeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_model(m: recipes::Model) -> Result<Recipe> {
        let ingredients: Vec<String> = serde_json::from_str(&m.ingredients)
            .with_context(|| format!("Corrupt ingredients for recipe {}", m.id))?;
        let steps: Vec<String> = serde_json::from_str(&m.steps)
            .with_context(|| format!("Corrupt steps for recipe {}", m.id))?;

        Ok(Recipe::internal(
            m.id,
            RecipeFields {
                title: m.title,
                ingredients,
                steps,
                prep_time: m.prep_time,
                cook_time: m.cook_time,
                difficulty: m.difficulty,
                cuisine: m.cuisine,
            },
        ))
    }

    fn to_active_model(fields: &RecipeFields) -> Result<recipes::ActiveModel> {
        Ok(recipes::ActiveModel {
            title: Set(fields.title.clone()),
            ingredients: Set(serde_json::to_string(&fields.ingredients)?),
            steps: Set(serde_json::to_string(&fields.steps)?),
            prep_time: Set(fields.prep_time.clone()),
            cook_time: Set(fields.cook_time.clone()),
            difficulty: Set(fields.difficulty.clone()),
            cuisine: Set(fields.cuisine.clone()),
            ..Default::default()
        })
    }

    // ========================================================================
    // Recipe Operations
    // ========================================================================

    pub async fn list_all(&self) -> Result<Vec<Recipe>> {
        let txn = self.conn.begin().await?;
        let rows = Recipes::find()
            .order_by_asc(recipes::Column::Id)
            .all(&txn)
            .await?;
        txn.commit().await?;

        rows.into_iter().map(Self::map_model).collect()
    }

    pub async fn get(&self, id: i32) -> Result<Option<Recipe>> {
        let txn = self.conn.begin().await?;
        let row = Recipes::find_by_id(id).one(&txn).await?;
        txn.commit().await?;

        row.map(Self::map_model).transpose()
    }

    pub async fn insert(&self, fields: &RecipeFields) -> Result<Recipe> {
        let active_model = Self::to_active_model(fields)?;

        let txn = self.conn.begin().await?;
        let model = active_model.insert(&txn).await?;
        txn.commit().await?;

        debug!("Created recipe {}: {}", model.id, model.title);
        Self::map_model(model)
    }

    pub async fn update(&self, id: i32, fields: &RecipeFields) -> Result<Option<Recipe>> {
        let txn = self.conn.begin().await?;

        if Recipes::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(None);
        }

        let mut active_model = Self::to_active_model(fields)?;
        active_model.id = Set(id);
        let model = active_model.update(&txn).await?;
        txn.commit().await?;

        debug!("Updated recipe {}", id);
        Self::map_model(model).map(Some)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;
        let result = Recipes::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    /// Inserts `samples` with ids `1..=n` into a table that has never held
    /// a row.
    ///
    /// A table emptied by deletes keeps its `sqlite_sequence` entry and is
    /// left alone, so handed-out ids never come back. The check and the
    /// insert share one transaction, so two processes opening the same file
    /// cannot both seed it.
    pub async fn seed_if_empty(&self, samples: &[RecipeFields]) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let sequence = txn
            .query_one(Statement::from_string(
                txn.get_database_backend(),
                "SELECT seq FROM sqlite_sequence WHERE name = 'recipes'",
            ))
            .await?;

        if sequence.is_some() || Recipes::find().count(&txn).await? > 0 {
            return Ok(false);
        }

        let mut models = Vec::with_capacity(samples.len());
        for (id, fields) in (1..).zip(samples) {
            let mut active_model = Self::to_active_model(fields)?;
            active_model.id = Set(id);
            models.push(active_model);
        }

        if !models.is_empty() {
            Recipes::insert_many(models).exec(&txn).await?;
        }
        txn.commit().await?;

        info!("Seeded recipes table with {} sample recipes", samples.len());
        Ok(true)
    }

    /// Removes every recipe and resets the id sequence.
    pub async fn clear(&self) -> Result<()> {
        let txn = self.conn.begin().await?;
        Recipes::delete_many().exec(&txn).await?;
        txn.execute_unprepared("DELETE FROM sqlite_sequence WHERE name = 'recipes'")
            .await?;
        txn.commit().await?;
        Ok(())
    }
}
