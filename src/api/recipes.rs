use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{json_body, normalize_search_query, parse_recipe_id};
use super::{ApiError, AppState};
use crate::models::{Recipe, RecipeFields};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(state.recipes().list().await?))
}

/// `GET /recipes/search?q=` merges stored and upstream matches.
pub async fn search_recipes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let query = normalize_search_query(params.q.as_deref());
    Ok(Json(state.recipes().search(query).await?))
}

pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let id = parse_recipe_id(&id)?;
    Ok(Json(state.recipes().get(&id).await?))
}

pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecipeFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let fields = json_body(payload)?;
    let recipe = state.recipes().create(fields).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn update_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<RecipeFields>, JsonRejection>,
) -> Result<Json<Recipe>, ApiError> {
    let id = parse_recipe_id(&id)?;
    let fields = json_body(payload)?;
    Ok(Json(state.recipes().update(&id, fields).await?))
}

pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_recipe_id(&id)?;
    state.recipes().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
