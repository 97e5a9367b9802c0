//! Translation cache statistics.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::server::AppState;

/// GET /api/cache/stats
pub async fn get_cache_stats(State(state): State<Arc<AppState>>) -> Json<Value> {
    let cache = state.cache().stats();
    Json(json!({
        "hit_rate": cache.hit_rate(),
        "cache": cache,
        "resolver": state.resolver.stats(),
    }))
}
