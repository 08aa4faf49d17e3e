#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use http_body_util::BodyExt;
use recipebox::clients::{Meal, MealSource};
use recipebox::config::{CacheBackend, Config};
use recipebox::state::SharedState;
use recipebox::storage::{MemoryRecipeStore, RecipeStore};
use serde_json::Value;

/// Upstream stand-in: returns fixed meals, or fails, and counts calls.
#[derive(Default)]
pub struct FakeMealDb {
    pub meals: Vec<Meal>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeMealDb {
    pub fn with_meals(meals: Vec<Meal>) -> Arc<Self> {
        Arc::new(Self {
            meals,
            ..Self::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MealSource for FakeMealDb {
    async fn search_meals(&self, _query: &str) -> anyhow::Result<Vec<Meal>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("upstream returned 503");
        }
        Ok(self.meals.clone())
    }
}

pub fn meal(id: &str, name: &str) -> Meal {
    Meal {
        id_meal: id.to_string(),
        str_meal: Some(name.to_string()),
        str_instructions: Some("Preheat oven. Bake.".to_string()),
        str_area: Some("Japanese".to_string()),
        str_meal_thumb: Some(format!("https://www.themealdb.com/images/{id}.jpg")),
        ..Meal::default()
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.cache.backend = CacheBackend::Memory;
    config
}

pub async fn spawn_app_with(store: Arc<dyn RecipeStore>, source: Arc<dyn MealSource>) -> Router {
    let shared = SharedState::with_components(test_config(), store, source)
        .await
        .expect("Failed to create shared state");
    let state = recipebox::api::create_app_state(Arc::new(shared), None);
    recipebox::api::router(state)
}

pub async fn spawn_app() -> Router {
    spawn_app_with(
        Arc::new(MemoryRecipeStore::new()),
        FakeMealDb::with_meals(Vec::new()),
    )
    .await
}

pub fn temp_db_url() -> String {
    let path = std::env::temp_dir().join(format!("recipebox-test-{}.db", uuid::Uuid::new_v4()));
    format!("sqlite:{}", path.display())
}

pub fn pancakes() -> Value {
    serde_json::json!({
        "title": "Test Pancakes",
        "ingredients": ["flour", "milk", "egg", "sugar"],
        "steps": ["Mix", "Cook"],
        "prepTime": "5 minutes",
        "cookTime": "10 minutes",
        "difficulty": "Easy",
        "cuisine": "American"
    })
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    use tower::ServiceExt;

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}
