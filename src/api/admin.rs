//! Cache administration endpoints.
//!
//! These never fail: an unreachable cache is reported in the body with
//! a 200 status.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::AppState;
use crate::cache::CacheStats;

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CacheHealthResponse {
    pub healthy: bool,
    pub service: &'static str,
}

/// `GET /admin/cache/stats`
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.cache().stats().await)
}

/// `DELETE /admin/cache/clear`
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<ClearCacheResponse> {
    let success = state.cache().clear().await;
    if success {
        info!("Search cache cleared");
    }

    Json(ClearCacheResponse {
        success,
        message: if success {
            "Cache cleared".to_string()
        } else {
            "Cache clear failed".to_string()
        },
    })
}

/// `GET /admin/cache/health`
pub async fn cache_health(State(state): State<Arc<AppState>>) -> Json<CacheHealthResponse> {
    let cache = state.cache();
    Json(CacheHealthResponse {
        healthy: cache.health_check().await,
        service: cache.backend_name(),
    })
}
