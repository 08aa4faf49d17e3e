use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::domain::{RecipeId, RecipeSource};
use crate::models::{Recipe, RecipeFields};

/// Upstream API exposes at most this many numbered ingredient/measure pairs.
const MAX_INGREDIENTS: usize = 20;

const UNKNOWN: &str = "Unknown";
const DEFAULT_DIFFICULTY: &str = "Medium";

/// Free-text meal search against an upstream catalog.
#[async_trait]
pub trait MealSource: Send + Sync {
    async fn search_meals(&self, query: &str) -> Result<Vec<Meal>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    meals: Option<Vec<Meal>>,
}

/// A meal as returned by `search.php`.
///
/// The numbered `strIngredientN` / `strMeasureN` fields land in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meal {
    #[serde(rename = "idMeal")]
    pub id_meal: String,
    #[serde(rename = "strMeal")]
    pub str_meal: Option<String>,
    #[serde(rename = "strInstructions")]
    pub str_instructions: Option<String>,
    #[serde(rename = "strArea")]
    pub str_area: Option<String>,
    #[serde(rename = "strMealThumb")]
    pub str_meal_thumb: Option<String>,
    #[serde(rename = "strYoutube")]
    pub str_youtube: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

impl Meal {
    fn field(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn ingredients(&self) -> Vec<String> {
        (1..=MAX_INGREDIENTS)
            .filter_map(|i| {
                let ingredient = non_blank(self.field(&format!("strIngredient{i}")))?;
                let measure = non_blank(self.field(&format!("strMeasure{i}")));

                Some(measure.map_or_else(
                    || ingredient.to_string(),
                    |m| format!("{m} {ingredient}"),
                ))
            })
            .collect()
    }

    /// Instructions split on `.`, trimmed, blanks dropped.
    #[must_use]
    pub fn steps(&self) -> Vec<String> {
        self.str_instructions
            .as_deref()
            .unwrap_or_default()
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    #[must_use]
    pub fn into_recipe(self) -> Recipe {
        let ingredients = self.ingredients();
        let steps = self.steps();

        Recipe {
            id: RecipeId::external(&self.id_meal),
            fields: RecipeFields {
                title: self.str_meal.unwrap_or_else(|| UNKNOWN.to_string()),
                ingredients,
                steps,
                prep_time: UNKNOWN.to_string(),
                cook_time: UNKNOWN.to_string(),
                difficulty: DEFAULT_DIFFICULTY.to_string(),
                cuisine: self.str_area.unwrap_or_else(|| UNKNOWN.to_string()),
            },
            source: RecipeSource::Mealdb,
            image: self.str_meal_thumb.filter(|s| !s.trim().is_empty()),
            video: self.str_youtube.filter(|s| !s.trim().is_empty()),
            original_id: Some(self.id_meal),
        }
    }
}

#[derive(Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    #[must_use]
    pub fn with_shared_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/search.php", self.base_url))
            .with_context(|| format!("Invalid MealDB base URL: {}", self.base_url))?;
        url.query_pairs_mut().append_pair("s", query);
        Ok(url)
    }
}

#[async_trait]
impl MealSource for MealDbClient {
    async fn search_meals(&self, query: &str) -> Result<Vec<Meal>> {
        let url = self.search_url(query)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("MealDB API error: {} - {}", status, body));
        }

        let response: SearchResponse = response
            .json()
            .await
            .context("Malformed MealDB search response")?;

        Ok(response.meals.unwrap_or_default())
    }
}
