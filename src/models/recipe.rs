use serde::{Deserialize, Serialize};

use crate::domain::{RecipeId, RecipeSource};

/// The client-writable part of a recipe, used as the create/update body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFields {
    pub title: String,
    pub ingredients: Vec<String>,
    /// Preparation sequence; order is significant.
    pub steps: Vec<String>,
    pub prep_time: String,
    pub cook_time: String,
    pub difficulty: String,
    pub cuisine: String,
}

impl RecipeFields {
    /// Case-insensitive substring match on the title. An empty query matches nothing.
    #[must_use]
    pub fn title_matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    #[serde(flatten)]
    pub fields: RecipeFields,
    #[serde(default)]
    pub source: RecipeSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
}

impl Recipe {
    #[must_use]
    pub const fn internal(id: i32, fields: RecipeFields) -> Self {
        Self {
            id: RecipeId::Internal(id),
            fields,
            source: RecipeSource::Internal,
            image: None,
            video: None,
            original_id: None,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.fields.title
    }
}
