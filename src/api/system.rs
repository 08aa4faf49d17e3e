use axum::Json;

/// Liveness probe.
pub async fn ping() -> Json<&'static str> {
    Json("pong")
}
